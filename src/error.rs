use std::path::PathBuf;

/// Failures while loading and validating a scene description. These are
/// reported to the user and skip the render; the menu loop keeps going.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("could not read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("scene JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown render mode '{0}'")]
    UnknownRenderMode(String),

    #[error("texture '{path}' is not a valid P3 ppm: {reason}")]
    Texture { path: PathBuf, reason: String },
}

/// Failures while writing the rendered image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not write output image: {0}")]
    Io(#[from] std::io::Error),
}
