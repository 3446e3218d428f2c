use crate::alert::core::{init, transition, AlarmState, Event};
use crate::alert::run_effect::RunEffect;
use crate::camera_session::CameraSession;
use crate::config::AlertConfig;
use crate::detection::context::DetectionContext;
use crate::device_display::interface::{CameraStatus, DeviceDisplay};
use crate::error::Error;
use crate::image_classifier::interface::FrameClassifier;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    /// No camera is selected; the scheduler stays idle.
    NothingToDo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A cycle completed; schedule the next one on the next redraw.
    Continue,
    /// The snapshot was empty and the scheduler switched itself off.
    AutoStopped,
    /// Not running, or the cycle was stopped while in flight.
    Idle,
}

/// Drives one classify/aggregate/alert cycle per [`tick`](Self::tick).
///
/// Stopping bumps an epoch; a cycle that sees a different epoch after its
/// captures settle throws its results away. The alarm state lock doubles as
/// the aggregation lock so a stop can never interleave with a window update.
pub struct PredictionScheduler {
    context: Arc<DetectionContext>,
    image_classifier: Arc<dyn FrameClassifier + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    run_effect: RunEffect,
    running: AtomicBool,
    epoch: AtomicU64,
    last_cycle: Mutex<Option<Instant>>,
    alarm: Mutex<AlarmState>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl PredictionScheduler {
    pub fn new(
        context: Arc<DetectionContext>,
        image_classifier: Arc<dyn FrameClassifier + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        run_effect: RunEffect,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            context,
            image_classifier,
            device_display,
            run_effect,
            running: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            last_cycle: Mutex::new(None),
            alarm: Mutex::new(init()),
            logger: logger.with_namespace("scheduler"),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn alarm_active(&self) -> bool {
        self.alarm().alarm_active
    }

    pub fn start(&self) -> StartOutcome {
        if self.context.registry.is_empty() {
            let _ = self.logger.info("No cameras selected, nothing to detect");
            self.display(|d| d.on_detection_changed(false));
            return StartOutcome::NothingToDo;
        }
        if self.running.swap(true, Ordering::SeqCst) {
            return StartOutcome::AlreadyRunning;
        }

        let _ = self.logger.info("Detection started");
        self.display(|d| d.on_detection_changed(true));
        StartOutcome::Started
    }

    /// Switches to idle. Takes effect at the next cycle boundary; an
    /// in-flight cycle completes but its results are dropped.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            let _ = self.logger.info("Detection stopped");
        }
        self.enter_idle();
    }

    pub fn set_test_mode(&self, on: bool) {
        if self.context.set_test_mode(on) == on {
            return;
        }
        let _ = self.logger.info(&format!("Test mode {}", if on { "on" } else { "off" }));
        self.apply_alarm_event(&mut self.alarm(), Event::TestModeChanged(on));
    }

    pub fn update_alert_config(&self, alert: AlertConfig) {
        let _ = self.logger.info(&format!(
            "Alert rule: {} samples, threshold {:.2}",
            alert.sample_size, alert.probability_threshold
        ));
        self.context.set_alert_config(alert);
    }

    pub fn tick(&self, now: Instant) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }

        let sessions = self.context.registry.snapshot();
        if sessions.is_empty() {
            return self.auto_stop();
        }

        self.update_rate(now);

        let epoch = self.epoch.load(Ordering::SeqCst);
        let config = self.context.alert_config();
        let outcomes = self.classify_all(&sessions);

        self.aggregate(epoch, &sessions, outcomes, &config)
    }

    /// Captures and classifies every session concurrently and waits for all
    /// of them. Results line up with `sessions`.
    fn classify_all(&self, sessions: &[Arc<CameraSession>]) -> Vec<Result<f32, Error>> {
        let image_classifier = &self.image_classifier;

        std::thread::scope(|scope| {
            let handles: Vec<_> = sessions
                .iter()
                .map(|session| {
                    scope.spawn(move || -> Result<f32, Error> {
                        let frame = session.capture_frame()?;
                        let probability = image_classifier.classify(&frame)?;
                        validate_probability(probability)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(Error::Classification("classifier panicked".to_string()))
                    })
                })
                .collect()
        })
    }

    fn aggregate(
        &self,
        epoch: u64,
        sessions: &[Arc<CameraSession>],
        outcomes: Vec<Result<f32, Error>>,
        config: &AlertConfig,
    ) -> TickOutcome {
        let mut alarm = self.alarm();

        if !self.is_running() || self.epoch.load(Ordering::SeqCst) != epoch {
            let _ = self.logger.info("Stopped during cycle, results dropped");
            return TickOutcome::Idle;
        }
        if self.context.registry.is_empty() {
            drop(alarm);
            return self.auto_stop();
        }

        let mut statuses: Vec<CameraStatus> = Vec::with_capacity(sessions.len());
        for (session, outcome) in sessions.iter().zip(outcomes) {
            match outcome {
                Ok(probability) => statuses.push(session.record(probability, config)),
                Err(Error::NoFrame { .. }) => {}
                Err(e) => {
                    let _ = self
                        .logger
                        .error(&format!("{} skipped this cycle: {}", session.label(), e));
                }
            }
        }

        let alerting: Vec<String> = sessions
            .iter()
            .filter(|session| session.evaluate(config).is_alerting())
            .map(|session| session.label().to_string())
            .collect();

        self.apply_alarm_event(
            &mut alarm,
            Event::CycleEvaluated {
                alerting,
                test_mode: self.context.test_mode(),
            },
        );
        self.display(|d| d.on_cycle_result(&statuses));

        TickOutcome::Continue
    }

    fn auto_stop(&self) -> TickOutcome {
        if !self.running.swap(false, Ordering::SeqCst) {
            return TickOutcome::Idle;
        }
        let _ = self.logger.info("No cameras left, detection stopped");
        self.enter_idle();
        self.display(|d| d.on_auto_stop());
        TickOutcome::AutoStopped
    }

    fn enter_idle(&self) {
        let mut alarm = self.alarm();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *self.last_cycle() = None;

        self.apply_alarm_event(&mut alarm, Event::DetectionStopped);

        let cleared: Vec<CameraStatus> = self
            .context
            .registry
            .snapshot()
            .iter()
            .map(|session| session.reset())
            .collect();

        self.display(|d| d.on_cycle_result(&cleared));
        self.display(|d| d.on_rate_update(None));
        self.display(|d| d.on_detection_changed(false));
    }

    fn update_rate(&self, now: Instant) {
        let mut last_cycle = self.last_cycle();
        if let Some(previous) = *last_cycle {
            let elapsed = now.saturating_duration_since(previous);
            if !elapsed.is_zero() {
                let rate = 1.0 / elapsed.as_secs_f64();
                self.display(|d| d.on_rate_update(Some(rate)));
            }
        }
        *last_cycle = Some(now);
    }

    fn apply_alarm_event(&self, alarm: &mut AlarmState, event: Event) {
        let (next, effects) = transition(*alarm, event);
        *alarm = next;
        self.run_effect.run_effects(effects);
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

    fn alarm(&self) -> MutexGuard<'_, AlarmState> {
        self.alarm.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn last_cycle(&self) -> MutexGuard<'_, Option<Instant>> {
        self.last_cycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_probability(probability: f32) -> Result<f32, Error> {
    if (0.0..=1.0).contains(&probability) {
        Ok(probability)
    } else {
        Err(Error::Classification(format!(
            "probability {} outside [0, 1]",
            probability
        )))
    }
}
