use crate::device_camera::interface::{CameraId, DeviceInfo};
use crate::device_display::interface::{format_rate, CameraStatus, DeviceDisplay};
use crate::library::logger::interface::Logger;
use std::error::Error;
use std::sync::Arc;

/// Prints readouts whenever they change.
pub struct DeviceDisplayConsole {
    cameras: Vec<CameraStatus>,
    rate: Option<f64>,
    last_rendered: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceDisplayConsole {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            cameras: Vec::new(),
            rate: None,
            last_rendered: String::new(),
            logger: logger.with_namespace("display"),
        }
    }

    fn render_display(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let rendered = self
            .cameras
            .iter()
            .map(|c| {
                let marker = if c.alerting { "!!" } else { "  " };
                format!("{}{:<16}{:>8}", marker, c.label, c.readout.to_display_string())
            })
            .collect::<Vec<_>>()
            .join("\n");

        if rendered == self.last_rendered {
            return Ok(());
        }

        println!("┌──────────────────────────┐");
        for line in rendered.lines() {
            println!("│{:<26}│", line);
        }
        println!("│{:<26}│", format!("  rate {} fps", format_rate(self.rate)));
        println!("└──────────────────────────┘");

        self.last_rendered = rendered;
        Ok(())
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info("Console display ready")?;
        Ok(())
    }

    fn on_cycle_result(
        &mut self,
        statuses: &[CameraStatus],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        for status in statuses {
            match self.cameras.iter_mut().find(|c| c.id == status.id) {
                Some(existing) => *existing = status.clone(),
                None => self.cameras.push(status.clone()),
            }
        }
        self.render_display()
    }

    fn on_auto_stop(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info("No cameras left, detection switched off")?;
        Ok(())
    }

    fn on_rate_update(&mut self, rate: Option<f64>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.rate = rate;
        Ok(())
    }

    fn on_detection_changed(&mut self, running: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
        let message = if running {
            "Detection on"
        } else {
            "Detection off"
        };
        self.logger.info(message)?;
        Ok(())
    }

    fn on_visual_alert(
        &mut self,
        cameras: Option<&[String]>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        match cameras {
            Some(cameras) => self.logger.error(&format!(
                "POSSIBLE DROWNING: {}",
                cameras.join(", ")
            ))?,
            None => self.logger.info("Alert dismissed")?,
        }
        Ok(())
    }

    fn on_devices(
        &mut self,
        devices: &[DeviceInfo],
        active: &[CameraId],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.cameras.retain(|c| active.contains(&c.id));
        for device in devices {
            let marker = if active.contains(&device.id) { "x" } else { " " };
            self.logger
                .info(&format!("[{}] {} ({})", marker, device.label, device.id))?;
        }
        Ok(())
    }
}
