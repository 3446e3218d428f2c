use crate::device_camera::interface::{CameraId, DeviceInfo};
use std::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Readout {
    /// Detection stopped.
    Cleared,
    /// Window still warming up.
    NotReady,
    Average(f32),
}

impl Readout {
    pub fn to_display_string(&self) -> String {
        match self {
            Readout::Cleared => String::new(),
            Readout::NotReady => "---".to_string(),
            Readout::Average(p) => format!("{:.2}%", p * 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraStatus {
    pub id: CameraId,
    pub label: String,
    pub readout: Readout,
    pub alerting: bool,
}

pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.2}", rate),
        None => "-".to_string(),
    }
}

/// Surface the detection loop reports to. Cameras whose pipeline failed in
/// a cycle are left out of that cycle's statuses.
pub trait DeviceDisplay: Send + Sync {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn on_cycle_result(&mut self, statuses: &[CameraStatus])
        -> Result<(), Box<dyn Error + Send + Sync>>;

    /// The scheduler found no cameras and switched itself off.
    fn on_auto_stop(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Cycles per second, `None` when unknown.
    fn on_rate_update(&mut self, rate: Option<f64>) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn on_detection_changed(&mut self, running: bool) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// `Some` when the blocking interrupt opens, listing the offending
    /// cameras; `None` when it closes.
    fn on_visual_alert(
        &mut self,
        cameras: Option<&[String]>,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn on_devices(
        &mut self,
        devices: &[DeviceInfo],
        active: &[CameraId],
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readout_strings() {
        assert_eq!(Readout::Cleared.to_display_string(), "");
        assert_eq!(Readout::NotReady.to_display_string(), "---");
        assert_eq!(Readout::Average(2.0 / 3.0).to_display_string(), "66.67%");
    }

    #[test]
    fn rate_strings() {
        assert_eq!(format_rate(None), "-");
        assert_eq!(format_rate(Some(59.94)), "59.94");
    }
}
