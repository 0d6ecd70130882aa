/*

    Colour helpers.

    Radiance is carried as a Vector3 of linear channel values in the
    0..255-referenced range; these helpers cover the few operations a
    plain vector does not give us.

*/

use crate::numeric::{Float, Vector3};

/// Linear RGB radiance, 0..255 referenced while in flight, clamped on output.
pub type Color = Vector3;

/// True iff every channel is at or below 0.1. Used to kill photons and
/// near-black contributions early.
pub fn below_threshold(c: Color) -> bool {
    c.x <= 0.1 && c.y <= 0.1 && c.z <= 0.1
}

/// Clamp every channel into the displayable [0, 255] range.
pub fn clamp_255(c: Color) -> Color {
    c.clamp(Color::ZERO, Color::splat(255.0))
}

/// Rec. 709 luminance of a colour whose channels are already in [0, 1].
pub fn luminance(c: Color) -> Float {
    0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z
}
