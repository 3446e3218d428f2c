use crate::config::AlertConfig;
use crate::device_display::interface::Readout;
use crate::probability_window::ProbabilityWindow;

/// Per-camera sub-state, recomputed from the window every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraAlertState {
    #[default]
    Insufficient,
    Normal,
    Alerting,
}

impl CameraAlertState {
    pub fn is_alerting(&self) -> bool {
        matches!(self, CameraAlertState::Alerting)
    }
}

pub fn evaluate(window: &ProbabilityWindow, config: &AlertConfig) -> CameraAlertState {
    if !window.is_full() {
        CameraAlertState::Insufficient
    } else if window.average() >= config.probability_threshold {
        CameraAlertState::Alerting
    } else {
        CameraAlertState::Normal
    }
}

pub fn readout(window: &ProbabilityWindow) -> Readout {
    if window.is_full() {
        Readout::Average(window.average())
    } else {
        Readout::NotReady
    }
}

/// Global alarm output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlarmState {
    /// Test-mode tone is playing.
    pub alarm_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CycleEvaluated {
        alerting: Vec<String>,
        test_mode: bool,
    },
    TestModeChanged(bool),
    DetectionStopped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartTone,
    StopTone,
    ShowVisualAlert { cameras: Vec<String> },
    DismissVisualAlert,
}

pub fn init() -> AlarmState {
    AlarmState::default()
}

pub fn transition(state: AlarmState, event: Event) -> (AlarmState, Vec<Effect>) {
    match event {
        Event::CycleEvaluated {
            alerting,
            test_mode: true,
        } => match (alerting.is_empty(), state.alarm_active) {
            (false, false) => (
                AlarmState { alarm_active: true },
                vec![Effect::StartTone],
            ),
            (true, true) => (
                AlarmState {
                    alarm_active: false,
                },
                vec![Effect::StopTone],
            ),
            _ => (state, vec![]),
        },

        Event::CycleEvaluated {
            alerting,
            test_mode: false,
        } => {
            let mut effects = vec![];
            if state.alarm_active {
                effects.push(Effect::StopTone);
            }
            if !alerting.is_empty() {
                effects.push(Effect::ShowVisualAlert { cameras: alerting });
            }
            (
                AlarmState {
                    alarm_active: false,
                },
                effects,
            )
        }

        Event::TestModeChanged(false) if state.alarm_active => (
            AlarmState {
                alarm_active: false,
            },
            vec![Effect::StopTone],
        ),
        Event::TestModeChanged(_) => (state, vec![]),

        Event::DetectionStopped => (
            AlarmState {
                alarm_active: false,
            },
            vec![Effect::DismissVisualAlert, Effect::StopTone],
        ),
    }
}
