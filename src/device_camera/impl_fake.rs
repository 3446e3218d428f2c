use crate::config::FakeCameraConfig;
use crate::device_camera::interface::{
    CameraId, CaptureStream, DeviceCamera, DeviceCameraEvent, DeviceInfo, Frame,
};
use crate::error::Error;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

pub struct DeviceCameraFake {
    devices: Mutex<Vec<FakeCameraConfig>>,
    subscribers: Mutex<Vec<Sender<DeviceCameraEvent>>>,
    open_streams: Arc<AtomicUsize>,
    warmup_frames: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraFake {
    pub fn new(devices: Vec<FakeCameraConfig>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            devices: Mutex::new(devices),
            subscribers: Mutex::new(Vec::new()),
            open_streams: Arc::new(AtomicUsize::new(0)),
            warmup_frames: 0,
            logger: logger.with_namespace("camera").with_namespace("fake"),
        }
    }

    /// Streams report a zero-sized surface for the first `frames` captures.
    pub fn with_warmup_frames(mut self, frames: u32) -> Self {
        self.warmup_frames = frames;
        self
    }

    #[cfg(test)]
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn connect(&self, device: FakeCameraConfig) {
        let _ = self.logger.info(&format!("Device connected: {}", device.label));
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(device);
        self.notify();
    }

    #[cfg(test)]
    pub fn disconnect(&self, id: &CameraId) {
        let _ = self.logger.info(&format!("Device disconnected: {}", id));
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|d| d.id != id.0);
        self.notify();
    }

    #[cfg(test)]
    fn notify(&self) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(DeviceCameraEvent::DevicesChanged).is_ok());
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn list_devices(&self) -> Result<Vec<DeviceInfo>, Error> {
        Ok(self
            .devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|d| DeviceInfo {
                id: CameraId(d.id.clone()),
                label: d.label.clone(),
            })
            .collect())
    }

    fn open_stream(&self, id: &CameraId) -> Result<Box<dyn CaptureStream>, Error> {
        let device = self
            .devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|d| d.id == id.0)
            .cloned()
            .ok_or_else(|| Error::CaptureUnavailable {
                camera: id.to_string(),
                reason: "device unavailable".to_string(),
            })?;

        if device.permission_denied {
            return Err(Error::CaptureUnavailable {
                camera: id.to_string(),
                reason: "permission denied".to_string(),
            });
        }

        let _ = self.logger.info(&format!("Opening stream for {}", device.label));
        self.open_streams.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(CaptureStreamFake {
            camera: id.clone(),
            width: device.width,
            height: device.height,
            warmup_remaining: AtomicU32::new(self.warmup_frames),
            closed: AtomicBool::new(false),
            open_streams: self.open_streams.clone(),
        }))
    }

    fn events(&self) -> Receiver<DeviceCameraEvent> {
        let (tx, rx) = channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }
}

struct CaptureStreamFake {
    camera: CameraId,
    width: u32,
    height: u32,
    warmup_remaining: AtomicU32,
    closed: AtomicBool,
    open_streams: Arc<AtomicUsize>,
}

impl CaptureStream for CaptureStreamFake {
    fn current_frame(&self) -> Result<Frame, Error> {
        let warming_up = self
            .warmup_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if warming_up || self.closed.load(Ordering::SeqCst) {
            return Ok(Frame {
                camera: self.camera.clone(),
                width: 0,
                height: 0,
                rgb: Vec::new(),
            });
        }

        let shade = rand::random::<u8>();
        Ok(Frame {
            camera: self.camera.clone(),
            width: self.width,
            height: self.height,
            rgb: vec![shade; (self.width * self.height * 3) as usize],
        })
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.open_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for CaptureStreamFake {
    fn drop(&mut self) {
        self.close();
    }
}
