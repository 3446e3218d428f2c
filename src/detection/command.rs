use crate::device_camera::interface::CameraId;

/// Requests from the UI surface, drained by the app between cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartDetection,
    StopDetection,
    SetTestMode(bool),
    UpdateAlertRule {
        sample_size: usize,
        threshold_percent: f32,
    },
    SelectCameras(Vec<CameraId>),
    DismissAlert,
    Quit,
}
