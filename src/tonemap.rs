/*

    Tone mapping of the accumulated HDR buffer.

    Operators work on 0..255-referenced channels; everything leaving
    here is clamped into the displayable range. The operator is chosen
    per scene via the optional "tonemap" JSON block.

*/

use crate::color::{clamp_255, luminance, Color};
use crate::prelude::*;

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToneMapOperator {
    #[default]
    Linear,
    Aces,
    Reinhard,
    Gamma,
    Histogram,
}

#[derive(Debug, Clone, Copy, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ToneMap {
    pub operator: ToneMapOperator,
    #[default = 2.2]
    pub gamma: Float,
}

impl ToneMap {
    /// Map the whole buffer in place.
    pub fn apply(&self, pixels: &mut [Color], exposure: Float) {
        match self.operator {
            ToneMapOperator::Linear => {
                for p in pixels.iter_mut() {
                    *p = linear_tone_map(*p, exposure);
                }
            }
            ToneMapOperator::Aces => {
                for p in pixels.iter_mut() {
                    *p = aces_fitted_tone_map(*p, exposure);
                }
            }
            ToneMapOperator::Reinhard => {
                for p in pixels.iter_mut() {
                    *p = reinhard_tone_map(*p, exposure);
                }
            }
            ToneMapOperator::Gamma => {
                for p in pixels.iter_mut() {
                    *p = gamma_correct(linear_tone_map(*p, exposure), self.gamma);
                }
            }
            ToneMapOperator::Histogram => apply_histogram_equalisation(pixels, exposure),
        }
    }
}

/// Exposure scale and clamp.
pub fn linear_tone_map(hdr: Color, exposure: Float) -> Color {
    clamp_255(hdr * exposure)
}

/// ACES filmic fit, evaluated on [0, 1] channels.
pub fn aces_fitted_tone_map(hdr: Color, exposure: Float) -> Color {
    const A: Float = 0.0245786;
    const B: Float = 0.000090537;
    const C: Float = 0.983729;
    const D: Float = 0.432951;
    const E: Float = 0.238081;

    let x = hdr / 255.0 * exposure;
    let mapped = (x * (x + Color::splat(A)) - Color::splat(B))
        / (x * (x * C + Color::splat(D)) + Color::splat(E));
    mapped.clamp(Color::ZERO, Color::ONE) * 255.0
}

/// Reinhard global operator on Rec. 709 luminance.
pub fn reinhard_tone_map(hdr: Color, exposure: Float) -> Color {
    let normalised = hdr / 255.0;
    let y = luminance(normalised);
    if y <= 0.0 {
        return Color::ZERO;
    }
    let y_scaled = y * exposure;
    let y_mapped = y_scaled / (1.0 + y_scaled);
    clamp_255(normalised * (y_mapped / y) * 255.0)
}

pub fn gamma_correct(linear: Color, gamma: Float) -> Color {
    let normalised = (linear / 255.0).max(Color::ZERO);
    clamp_255(normalised.powf(1.0 / gamma) * 255.0)
}

const HISTOGRAM_BINS: usize = 256;

fn pixel_bin(p: Color) -> usize {
    let lum = 0.2126 * p.x + 0.7152 * p.y + 0.0722 * p.z;
    (lum.max(0.0) as usize).min(HISTOGRAM_BINS - 1)
}

pub fn compute_histogram(pixels: &[Color]) -> Vec<usize> {
    let mut histogram = vec![0usize; HISTOGRAM_BINS];
    for p in pixels {
        histogram[pixel_bin(*p)] += 1;
    }
    histogram
}

pub fn compute_cdf(histogram: &[usize]) -> Vec<Float> {
    let total: usize = histogram.iter().sum();
    let mut cdf = vec![0.0; histogram.len()];
    if total == 0 {
        return cdf;
    }
    let mut acc = 0.0;
    for (i, &count) in histogram.iter().enumerate() {
        acc += count as Float / total as Float;
        cdf[i] = acc;
    }
    cdf
}

/// Remap each pixel's luminance through the image CDF.
pub fn apply_histogram_equalisation(pixels: &mut [Color], exposure: Float) {
    let histogram = compute_histogram(pixels);
    let cdf = compute_cdf(&histogram);

    for p in pixels.iter_mut() {
        let lum = 0.2126 * p.x + 0.7152 * p.y + 0.0722 * p.z;
        if lum <= 0.0 {
            *p = Color::ZERO;
            continue;
        }
        let equalised = cdf[pixel_bin(*p)] * 255.0 * exposure;
        *p = clamp_255(*p * (equalised / lum));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extreme_pixels() -> Vec<Color> {
        vec![
            Color::ZERO,
            Color::splat(255.0),
            Color::splat(10_000.0),
            Color::new(-5.0, 500.0, 128.0),
            Color::new(1.0, 2.0, 3.0),
        ]
    }

    fn assert_in_range(pixels: &[Color]) {
        for p in pixels {
            for c in [p.x, p.y, p.z] {
                assert!((0.0..=255.0).contains(&c), "channel {c} out of range");
            }
        }
    }

    #[test]
    fn every_operator_clamps_to_display_range() {
        for operator in [
            ToneMapOperator::Linear,
            ToneMapOperator::Aces,
            ToneMapOperator::Reinhard,
            ToneMapOperator::Gamma,
            ToneMapOperator::Histogram,
        ] {
            let mut pixels = extreme_pixels();
            let tm = ToneMap {
                operator,
                gamma: 2.2,
            };
            tm.apply(&mut pixels, 1.5);
            assert_in_range(&pixels);
        }
    }

    #[test]
    fn linear_scales_by_exposure() {
        let c = linear_tone_map(Color::splat(100.0), 0.5);
        assert_eq!(c, Color::splat(50.0));
    }

    #[test]
    fn gamma_keeps_endpoints_fixed() {
        let black = gamma_correct(Color::ZERO, 2.2);
        let white = gamma_correct(Color::splat(255.0), 2.2);
        assert_eq!(black, Color::ZERO);
        assert!((white - Color::splat(255.0)).length() < 1e-3);
    }

    #[test]
    fn gamma_brightens_midtones() {
        let mid = gamma_correct(Color::splat(64.0), 2.2);
        assert!(mid.x > 64.0);
    }

    #[test]
    fn reinhard_preserves_hue_ratios() {
        let c = reinhard_tone_map(Color::new(200.0, 100.0, 50.0), 1.0);
        assert!((c.x / c.y - 2.0).abs() < 1e-3);
        assert!((c.y / c.z - 2.0).abs() < 1e-3);
    }

    #[test]
    fn aces_is_monotonic_in_input() {
        let low = aces_fitted_tone_map(Color::splat(50.0), 1.0);
        let high = aces_fitted_tone_map(Color::splat(200.0), 1.0);
        assert!(high.x > low.x);
    }

    #[test]
    fn cdf_is_monotonic_and_ends_at_one() {
        let pixels = extreme_pixels();
        let cdf = compute_cdf(&compute_histogram(&pixels));
        for pair in cdf.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!((cdf.last().unwrap() - 1.0).abs() < 1e-5);
    }
}
