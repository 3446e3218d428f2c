use crate::device_alarm::interface::DeviceAlarm;
use crate::device_display::interface::DeviceDisplay;
use crate::library::logger::interface::Logger;
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

/// Blocking alert shown in normal mode. Only one instance is ever open;
/// opening it starts the tone and dismissing it stops the tone.
pub struct VisualInterrupt {
    open: Mutex<Option<Vec<String>>>,
    alarm: Arc<dyn DeviceAlarm + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl VisualInterrupt {
    pub fn new(
        alarm: Arc<dyn DeviceAlarm + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            open: Mutex::new(None),
            alarm,
            device_display,
            logger: logger.with_namespace("interrupt"),
        }
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Cameras listed when the interrupt opened.
    #[cfg(test)]
    pub fn cameras(&self) -> Option<Vec<String>> {
        self.open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// No-op while already open.
    pub fn show(&self, cameras: &[String]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        if open.is_some() {
            return Ok(());
        }
        *open = Some(cameras.to_vec());

        self.logger
            .info(&format!("Possible drowning: {}", cameras.join(", ")))?;
        self.device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_visual_alert(Some(cameras))?;
        self.alarm.start()
    }

    pub fn dismiss(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        if open.take().is_none() {
            return Ok(());
        }

        self.logger.info("Dismissed")?;
        self.device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_visual_alert(None)?;
        self.alarm.stop()
    }
}
