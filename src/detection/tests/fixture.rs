use crate::alert::run_effect::RunEffect;
use crate::alert::visual_interrupt::VisualInterrupt;
use crate::config::{AlertConfig, FakeCameraConfig};
use crate::detection::context::DetectionContext;
use crate::detection::scheduler::{PredictionScheduler, TickOutcome};
use crate::device_alarm::impl_fake::DeviceAlarmFake;
use crate::device_camera::impl_fake::DeviceCameraFake;
use crate::device_camera::interface::{CameraId, DeviceInfo, Frame};
use crate::device_display::impl_fake::DeviceDisplayFake;
use crate::error::Error;
use crate::image_classifier::interface::FrameClassifier;
use crate::library::logger::impl_fake::LoggerFake;
use crate::session_registry::SessionRegistry;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Replays a per-camera script of probabilities (or failures). Cameras
/// with an exhausted script classify as `0.0`.
#[derive(Default)]
pub struct ImageClassifierScripted {
    scripts: Mutex<HashMap<CameraId, VecDeque<Result<f32, String>>>>,
}

impl ImageClassifierScripted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, camera: &str, outcomes: Vec<Result<f32, String>>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(CameraId::from(camera))
            .or_default()
            .extend(outcomes);
    }

    pub fn script_values(&self, camera: &str, values: &[f32]) {
        self.script(camera, values.iter().map(|&v| Ok(v)).collect());
    }
}

impl FrameClassifier for ImageClassifierScripted {
    fn classify(&self, frame: &Frame) -> Result<f32, Error> {
        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&frame.camera)
            .and_then(|script| script.pop_front());

        match next {
            Some(Ok(probability)) => Ok(probability),
            Some(Err(message)) => Err(Error::Classification(message)),
            None => Ok(0.0),
        }
    }
}

pub fn camera(id: &str) -> FakeCameraConfig {
    FakeCameraConfig {
        id: id.to_string(),
        label: id.to_uppercase(),
        width: 4,
        height: 3,
        permission_denied: false,
    }
}

pub fn device(id: &str) -> DeviceInfo {
    DeviceInfo {
        id: CameraId::from(id),
        label: id.to_uppercase(),
    }
}

pub struct Fixture {
    pub logger: LoggerFake,
    pub device_camera: Arc<DeviceCameraFake>,
    pub device_alarm: Arc<DeviceAlarmFake>,
    pub device_display: Arc<Mutex<DeviceDisplayFake>>,
    pub image_classifier: Arc<ImageClassifierScripted>,
    pub registry: Arc<SessionRegistry>,
    pub context: Arc<DetectionContext>,
    pub visual_interrupt: Arc<VisualInterrupt>,
    pub scheduler: Arc<PredictionScheduler>,
    now: Mutex<Instant>,
}

impl Fixture {
    pub fn new(cameras: &[&str], alert: AlertConfig) -> Self {
        let image_classifier = Arc::new(ImageClassifierScripted::new());
        Self::build(cameras, alert, image_classifier.clone(), image_classifier)
    }

    /// Runs the scheduler against `classifier` instead of the scripted one.
    pub fn with_classifier(
        cameras: &[&str],
        alert: AlertConfig,
        classifier: Arc<dyn FrameClassifier + Send + Sync>,
    ) -> Self {
        Self::build(
            cameras,
            alert,
            Arc::new(ImageClassifierScripted::new()),
            classifier,
        )
    }

    fn build(
        cameras: &[&str],
        alert: AlertConfig,
        image_classifier: Arc<ImageClassifierScripted>,
        classifier_in_use: Arc<dyn FrameClassifier + Send + Sync>,
    ) -> Self {
        let logger = LoggerFake::new();
        let device_camera = Arc::new(DeviceCameraFake::new(
            cameras.iter().map(|id| camera(id)).collect(),
            Arc::new(logger.clone()),
        ));
        let device_alarm = Arc::new(DeviceAlarmFake::new());
        let device_display = Arc::new(Mutex::new(DeviceDisplayFake::new()));

        let registry = Arc::new(SessionRegistry::new(
            device_camera.clone(),
            Arc::new(logger.clone()),
        ));
        for id in cameras {
            registry.upsert(&device(id), &alert).unwrap();
        }

        let context = Arc::new(DetectionContext::new(registry.clone(), alert, false));
        let visual_interrupt = Arc::new(VisualInterrupt::new(
            device_alarm.clone(),
            device_display.clone(),
            Arc::new(logger.clone()),
        ));
        let run_effect = RunEffect::new(
            device_alarm.clone(),
            visual_interrupt.clone(),
            Arc::new(logger.clone()),
        );
        let scheduler = Arc::new(PredictionScheduler::new(
            context.clone(),
            classifier_in_use,
            device_display.clone(),
            run_effect,
            Arc::new(logger.clone()),
        ));

        Self {
            logger,
            device_camera,
            device_alarm,
            device_display,
            image_classifier,
            registry,
            context,
            visual_interrupt,
            scheduler,
            now: Mutex::new(Instant::now()),
        }
    }

    /// Runs one cycle, 20 ms after the previous one.
    pub fn tick(&self) -> TickOutcome {
        let now = {
            let mut now = self.now.lock().unwrap();
            *now += Duration::from_millis(20);
            *now
        };
        self.scheduler.tick(now)
    }

    pub fn window(&self, id: &str) -> Vec<f32> {
        self.registry
            .get(&CameraId::from(id))
            .unwrap()
            .window()
            .samples()
            .collect()
    }

    pub fn display(&self) -> std::sync::MutexGuard<'_, DeviceDisplayFake> {
        self.device_display.lock().unwrap()
    }
}
