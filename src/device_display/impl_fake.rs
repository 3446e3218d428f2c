use crate::device_camera::interface::{CameraId, DeviceInfo};
use crate::device_display::interface::{CameraStatus, DeviceDisplay};
use std::error::Error;

/// Records every notification for assertions.
#[derive(Debug, Default)]
pub struct DeviceDisplayFake {
    pub cycles: Vec<Vec<CameraStatus>>,
    pub auto_stops: usize,
    pub rates: Vec<Option<f64>>,
    pub running: Vec<bool>,
    pub visual_alerts: Vec<Option<Vec<String>>>,
    pub devices: Vec<(Vec<DeviceInfo>, Vec<CameraId>)>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_cycle(&self) -> &[CameraStatus] {
        self.cycles.last().map(|c| c.as_slice()).unwrap_or(&[])
    }

}

impl DeviceDisplay for DeviceDisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn on_cycle_result(
        &mut self,
        statuses: &[CameraStatus],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.cycles.push(statuses.to_vec());
        Ok(())
    }

    fn on_auto_stop(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.auto_stops += 1;
        Ok(())
    }

    fn on_rate_update(&mut self, rate: Option<f64>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.rates.push(rate);
        Ok(())
    }

    fn on_detection_changed(&mut self, running: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.running.push(running);
        Ok(())
    }

    fn on_visual_alert(
        &mut self,
        cameras: Option<&[String]>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.visual_alerts.push(cameras.map(|c| c.to_vec()));
        Ok(())
    }

    fn on_devices(
        &mut self,
        devices: &[DeviceInfo],
        active: &[CameraId],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.devices.push((devices.to_vec(), active.to_vec()));
        Ok(())
    }
}
