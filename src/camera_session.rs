use crate::alert::core::{evaluate, readout, CameraAlertState};
use crate::config::AlertConfig;
use crate::device_camera::interface::{CameraId, CaptureStream, DeviceCamera, DeviceInfo, Frame};
use crate::device_display::interface::{CameraStatus, Readout};
use crate::error::Error;
use crate::library::logger::interface::Logger;
use crate::probability_window::ProbabilityWindow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct Aggregate {
    window: ProbabilityWindow,
    state: CameraAlertState,
}

impl Aggregate {
    fn new(config: &AlertConfig) -> Self {
        Self {
            window: ProbabilityWindow::new(config.sample_size),
            state: CameraAlertState::default(),
        }
    }
}

/// One selected camera: its capture stream plus its probability window.
pub struct CameraSession {
    id: CameraId,
    label: String,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    stream: Mutex<Option<Box<dyn CaptureStream>>>,
    aggregate: Mutex<Aggregate>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl CameraSession {
    pub fn new(
        device: &DeviceInfo,
        config: &AlertConfig,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            id: device.id.clone(),
            label: device.label.clone(),
            device_camera,
            stream: Mutex::new(None),
            aggregate: Mutex::new(Aggregate::new(config)),
            logger: logger.with_namespace(&format!("camera:{}", device.label)),
        }
    }

    pub fn id(&self) -> &CameraId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Opens the capture stream, closing any stream this session already
    /// holds first.
    pub fn activate(&self) -> Result<(), Error> {
        let mut stream = self.stream();
        if let Some(previous) = stream.take() {
            previous.close();
        }
        *stream = Some(self.device_camera.open_stream(&self.id)?);
        let _ = self.logger.info("Stream opened");
        Ok(())
    }

    pub fn deactivate(&self) {
        if let Some(stream) = self.stream().take() {
            stream.close();
            let _ = self.logger.info("Stream closed");
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.stream().is_some()
    }

    pub fn capture_frame(&self) -> Result<Frame, Error> {
        let no_frame = || Error::NoFrame {
            camera: self.label.clone(),
        };
        let frame = match self.stream().as_ref() {
            Some(stream) => stream.current_frame()?,
            None => return Err(no_frame()),
        };
        if frame.width == 0 || frame.height == 0 {
            return Err(no_frame());
        }
        Ok(frame)
    }

    /// Feeds one probability into the window and re-evaluates the alert
    /// sub-state under `config`.
    pub fn record(&self, probability: f32, config: &AlertConfig) -> CameraStatus {
        let mut aggregate = self.aggregate();
        aggregate.window.set_capacity(config.sample_size);
        aggregate.window.push(probability);
        aggregate.state = evaluate(&aggregate.window, config);
        self.status_of(&aggregate)
    }

    /// Re-evaluates the sub-state without adding a sample.
    pub fn evaluate(&self, config: &AlertConfig) -> CameraAlertState {
        let mut aggregate = self.aggregate();
        aggregate.window.set_capacity(config.sample_size);
        aggregate.state = evaluate(&aggregate.window, config);
        aggregate.state
    }

    #[cfg(test)]
    pub fn alert_state(&self) -> CameraAlertState {
        self.aggregate().state
    }

    #[cfg(test)]
    pub fn window(&self) -> ProbabilityWindow {
        self.aggregate().window.clone()
    }

    /// Empties the window and reports the cleared readout.
    pub fn reset(&self) -> CameraStatus {
        let mut aggregate = self.aggregate();
        aggregate.window.clear();
        aggregate.state = CameraAlertState::Insufficient;
        CameraStatus {
            id: self.id.clone(),
            label: self.label.clone(),
            readout: Readout::Cleared,
            alerting: false,
        }
    }

    fn status_of(&self, aggregate: &Aggregate) -> CameraStatus {
        CameraStatus {
            id: self.id.clone(),
            label: self.label.clone(),
            readout: readout(&aggregate.window),
            alerting: aggregate.state.is_alerting(),
        }
    }

    fn stream(&self) -> MutexGuard<'_, Option<Box<dyn CaptureStream>>> {
        self.stream.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn aggregate(&self) -> MutexGuard<'_, Aggregate> {
        self.aggregate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.deactivate();
    }
}
