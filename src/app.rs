use crate::alert::run_effect::RunEffect;
use crate::alert::visual_interrupt::VisualInterrupt;
use crate::config::{AlertConfig, Config};
use crate::detection::command::Command;
use crate::detection::context::DetectionContext;
use crate::detection::scheduler::PredictionScheduler;
use crate::device_alarm::interface::DeviceAlarm;
use crate::device_camera::interface::{CameraId, DeviceCamera, DeviceCameraEvent, DeviceInfo};
use crate::device_display::interface::DeviceDisplay;
use crate::frame_clock::interface::FrameClock;
use crate::image_classifier::interface::FrameClassifier;
use crate::library::logger::interface::Logger;
use crate::session_registry::SessionRegistry;
use std::ops::ControlFlow;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Wires the devices to the scheduler and runs the frame loop. Commands and
/// hot-plug events are handled between cycles.
pub struct App {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    registry: Arc<SessionRegistry>,
    context: Arc<DetectionContext>,
    visual_interrupt: Arc<VisualInterrupt>,
    scheduler: PredictionScheduler,
    device_events: Receiver<DeviceCameraEvent>,
    devices: Vec<DeviceInfo>,
}

impl App {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_alarm: Arc<dyn DeviceAlarm + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        image_classifier: Arc<dyn FrameClassifier + Send + Sync>,
    ) -> Self {
        let registry = Arc::new(SessionRegistry::new(device_camera.clone(), logger.clone()));
        let context = Arc::new(DetectionContext::new(
            registry.clone(),
            config.alert,
            config.test_mode,
        ));
        let visual_interrupt = Arc::new(VisualInterrupt::new(
            device_alarm.clone(),
            device_display.clone(),
            logger.clone(),
        ));
        let run_effect = RunEffect::new(device_alarm, visual_interrupt.clone(), logger.clone());
        let scheduler = PredictionScheduler::new(
            context.clone(),
            image_classifier,
            device_display.clone(),
            run_effect,
            logger.clone(),
        );
        let device_events = device_camera.events();

        Self {
            config,
            logger: logger.with_namespace("app"),
            device_camera,
            device_display,
            registry,
            context,
            visual_interrupt,
            scheduler,
            device_events,
            devices: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn scheduler(&self) -> &PredictionScheduler {
        &self.scheduler
    }

    #[cfg(test)]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn init(&mut self) {
        self.display(|d| d.init());
        self.refresh_devices();
        self.select_initial_cameras();

        if self.config.detect_on_start {
            self.scheduler.start();
        }
    }

    pub fn run(
        &mut self,
        frame_clock: &mut dyn FrameClock,
        commands: Receiver<Command>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.init();

        loop {
            let now = frame_clock.next_frame();
            if self.step(now, &commands).is_break() {
                break;
            }
        }

        self.shutdown();
        Ok(())
    }

    /// One redraw: hot-plug events, then queued commands, then a cycle.
    pub fn step(&mut self, now: Instant, commands: &Receiver<Command>) -> ControlFlow<()> {
        let mut devices_changed = false;
        while let Ok(DeviceCameraEvent::DevicesChanged) = self.device_events.try_recv() {
            devices_changed = true;
        }
        if devices_changed {
            self.refresh_devices();
        }

        loop {
            match commands.try_recv() {
                Ok(command) => {
                    if self.handle_command(command).is_break() {
                        return ControlFlow::Break(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    let _ = self.logger.info("Command channel closed");
                    return ControlFlow::Break(());
                }
            }
        }

        self.scheduler.tick(now);
        ControlFlow::Continue(())
    }

    pub fn shutdown(&self) {
        let _ = self.logger.info("Shutting down");
        self.scheduler.stop();
        self.registry.remove_all();
    }

    fn handle_command(&mut self, command: Command) -> ControlFlow<()> {
        let _ = self.logger.info(&format!("Command: {:?}", command));

        match command {
            Command::StartDetection => {
                self.scheduler.start();
            }
            Command::StopDetection => self.scheduler.stop(),
            Command::SetTestMode(on) => self.scheduler.set_test_mode(on),
            Command::UpdateAlertRule {
                sample_size,
                threshold_percent,
            } => match AlertConfig::from_percent(sample_size, threshold_percent) {
                Ok(alert) => self.scheduler.update_alert_config(alert),
                Err(e) => {
                    let _ = self.logger.error(&format!("Alert rule rejected: {}", e));
                }
            },
            Command::SelectCameras(ids) => self.select_cameras(&ids),
            Command::DismissAlert => {
                if let Err(e) = self.visual_interrupt.dismiss() {
                    let _ = self.logger.error(&format!("Failed to dismiss alert: {}", e));
                }
            }
            Command::Quit => return ControlFlow::Break(()),
        }

        ControlFlow::Continue(())
    }

    fn refresh_devices(&mut self) {
        let devices = match self.device_camera.list_devices() {
            Ok(devices) => devices,
            Err(e) => {
                let _ = self.logger.error(&format!("Failed to list cameras: {}", e));
                return;
            }
        };

        let removed = self.registry.reconcile(&devices);
        if removed > 0 {
            let _ = self
                .logger
                .info(&format!("{} camera(s) disconnected", removed));
        }

        self.devices = devices;
        self.publish_devices();
    }

    fn select_initial_cameras(&mut self) {
        let ids: Vec<CameraId> = match &self.config.selected_cameras {
            Some(ids) => ids.iter().map(|id| CameraId::from(id.as_str())).collect(),
            None => self.devices.iter().map(|d| d.id.clone()).collect(),
        };
        self.select_cameras(&ids);
    }

    /// Unknown ids are ignored.
    fn select_cameras(&mut self, ids: &[CameraId]) {
        let selected: Vec<DeviceInfo> = ids
            .iter()
            .filter_map(|id| self.devices.iter().find(|d| &d.id == id).cloned())
            .collect();

        let failures = self
            .registry
            .apply_selection(&selected, &self.context.alert_config());
        let _ = self.logger.info(&format!(
            "{} of {} selected camera(s) active",
            selected.len() - failures.len(),
            selected.len()
        ));
        self.publish_devices();
    }

    fn publish_devices(&self) {
        let active = self.registry.ids();
        let devices = self.devices.clone();
        self.display(|d| d.on_devices(&devices, &active));
    }

    fn display<F>(&self, f: F)
    where
        F: FnOnce(
            &mut (dyn DeviceDisplay + Send + Sync),
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>,
    {
        let mut device_display = self
            .device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = f(&mut *device_display) {
            let _ = self.logger.error(&format!("Display update failed: {}", e));
        }
    }
}
