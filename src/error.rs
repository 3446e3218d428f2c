use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The device could not be opened; the session is never created.
    #[error("camera {camera} unavailable: {reason}")]
    CaptureUnavailable { camera: String, reason: String },

    /// The capture surface has no dimensions yet. Transient.
    #[error("camera {camera} has no frame yet")]
    NoFrame { camera: String },

    #[error("classification failed: {0}")]
    Classification(String),

    #[error("model failed to load: {0}")]
    ModelLoad(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
