/// Audible alarm tone. Callers never inspect its internal state.
pub trait DeviceAlarm: Send + Sync {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
