use crate::error::Error;
use std::fmt;
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub String);

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CameraId {
    fn from(id: &str) -> Self {
        CameraId(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub id: CameraId,
    pub label: String,
}

/// One still taken from a capture stream. Width or height of zero means the
/// capture surface is not ready yet.
#[derive(Debug, Clone)]
pub struct Frame {
    pub camera: CameraId,
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCameraEvent {
    /// The fake provider only raises this from tests.
    #[allow(dead_code)]
    DevicesChanged,
}

pub trait CaptureStream: Send + Sync {
    fn current_frame(&self) -> Result<Frame, Error>;
    /// Must tolerate being called more than once.
    fn close(&self);
}

pub trait DeviceCamera: Send + Sync {
    fn list_devices(&self) -> Result<Vec<DeviceInfo>, Error>;
    fn open_stream(&self, id: &CameraId) -> Result<Box<dyn CaptureStream>, Error>;
    /// Hot-plug notifications.
    fn events(&self) -> Receiver<DeviceCameraEvent>;
}
