use crate::device_camera::interface::Frame;
use crate::error::Error;

/// Opaque model: returns the probability in [0, 1] that the frame shows a
/// possible drowning.
pub trait FrameClassifier: Send + Sync {
    fn classify(&self, frame: &Frame) -> Result<f32, Error>;
}
