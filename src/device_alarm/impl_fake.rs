use crate::device_alarm::interface::DeviceAlarm;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct DeviceAlarmFake {
    sounding: AtomicBool,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl DeviceAlarmFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl DeviceAlarm for DeviceAlarmFake {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.sounding.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.sounding.store(false, Ordering::SeqCst);
        Ok(())
    }
}
