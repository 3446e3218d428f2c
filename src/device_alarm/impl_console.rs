use crate::config::ToneConfig;
use crate::device_alarm::interface::DeviceAlarm;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Prints the tone instead of synthesizing it.
pub struct DeviceAlarmConsole {
    tone: ToneConfig,
    sounding: AtomicBool,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceAlarmConsole {
    pub fn new(tone: ToneConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            tone,
            sounding: AtomicBool::new(false),
            logger: logger.with_namespace("alarm").with_namespace("console"),
        }
    }
}

impl DeviceAlarm for DeviceAlarmConsole {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.sounding.swap(true, Ordering::SeqCst) {
            self.logger.info(&format!(
                "\x07Tone on: {:.0} Hz {:?} at {} dB",
                self.tone.frequency_hz, self.tone.waveform, self.tone.volume_db
            ))?;
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.sounding.swap(false, Ordering::SeqCst) {
            self.logger.info("Tone off")?;
        }
        Ok(())
    }
}
