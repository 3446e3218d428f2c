use crate::alert::core::Effect;
use crate::alert::visual_interrupt::VisualInterrupt;
use crate::device_alarm::interface::DeviceAlarm;
use crate::library::logger::interface::Logger;
use std::sync::Arc;

#[derive(Clone)]
pub struct RunEffect {
    alarm: Arc<dyn DeviceAlarm + Send + Sync>,
    visual_interrupt: Arc<VisualInterrupt>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl RunEffect {
    pub fn new(
        alarm: Arc<dyn DeviceAlarm + Send + Sync>,
        visual_interrupt: Arc<VisualInterrupt>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            alarm,
            visual_interrupt,
            logger: logger.with_namespace("alert"),
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let result = match effect {
            Effect::StartTone => self.alarm.start(),
            Effect::StopTone => self.alarm.stop(),
            Effect::ShowVisualAlert { cameras } => self.visual_interrupt.show(&cameras),
            Effect::DismissVisualAlert => self.visual_interrupt.dismiss(),
        };

        if let Err(e) = result {
            let _ = self.logger.error(&format!("Alarm output failed: {}", e));
        }
    }

    pub fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_effect(effect);
        }
    }
}
