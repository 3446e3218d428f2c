use crate::alert::core::{evaluate, init, readout, transition, CameraAlertState, Effect, Event};
use crate::config::AlertConfig;
use crate::device_display::interface::Readout;
use crate::probability_window::ProbabilityWindow;

fn cycle(alerting: &[&str], test_mode: bool) -> Event {
    Event::CycleEvaluated {
        alerting: alerting.iter().map(|s| s.to_string()).collect(),
        test_mode,
    }
}

#[test]
fn test_sub_state_follows_window() {
    let config = AlertConfig::new(3, 0.5).unwrap();
    let mut window = ProbabilityWindow::new(3);

    window.push(0.1);
    assert_eq!(evaluate(&window, &config), CameraAlertState::Insufficient);
    assert_eq!(readout(&window), Readout::NotReady);
    window.push(0.2);
    assert_eq!(evaluate(&window, &config), CameraAlertState::Insufficient);
    window.push(0.9);
    assert_eq!(evaluate(&window, &config), CameraAlertState::Normal);
    window.push(0.9);
    assert_eq!(evaluate(&window, &config), CameraAlertState::Alerting);
    assert_eq!(readout(&window).to_display_string(), "66.67%");

    // No stale alert once the average drops.
    window.push(0.0);
    window.push(0.0);
    assert_eq!(evaluate(&window, &config), CameraAlertState::Normal);
}

#[test]
fn test_threshold_is_inclusive() {
    let config = AlertConfig::new(2, 0.5).unwrap();
    let mut window = ProbabilityWindow::new(2);
    window.push(0.5);
    window.push(0.5);
    assert_eq!(evaluate(&window, &config), CameraAlertState::Alerting);
}

#[test]
fn test_mode_starts_tone_once_and_stops_when_clear() {
    let state = init();
    assert!(!state.alarm_active);

    let (state, effects) = transition(state, cycle(&["A"], true));
    assert!(state.alarm_active);
    assert_eq!(effects, vec![Effect::StartTone]);

    let (state, effects) = transition(state, cycle(&["A", "B"], true));
    assert!(state.alarm_active);
    assert!(effects.is_empty());

    let (state, effects) = transition(state, cycle(&[], true));
    assert!(!state.alarm_active);
    assert_eq!(effects, vec![Effect::StopTone]);

    let (state, effects) = transition(state, cycle(&[], true));
    assert!(!state.alarm_active);
    assert!(effects.is_empty());
}

#[test]
fn test_normal_mode_requests_interrupt_every_alerting_cycle() {
    let (state, effects) = transition(init(), cycle(&["Pool North"], false));
    assert!(!state.alarm_active);
    assert_eq!(
        effects,
        vec![Effect::ShowVisualAlert {
            cameras: vec!["Pool North".to_string()]
        }]
    );

    let (_, effects) = transition(state, cycle(&["Pool North"], false));
    assert_eq!(effects.len(), 1);

    let (_, effects) = transition(state, cycle(&[], false));
    assert!(effects.is_empty());
}

#[test]
fn test_leaving_test_mode_silences_tone() {
    let (state, _) = transition(init(), cycle(&["A"], true));
    assert!(state.alarm_active);

    let (state, effects) = transition(state, Event::TestModeChanged(false));
    assert!(!state.alarm_active);
    assert_eq!(effects, vec![Effect::StopTone]);

    let (state, effects) = transition(state, Event::TestModeChanged(true));
    assert!(!state.alarm_active);
    assert!(effects.is_empty());
}

#[test]
fn test_normal_cycle_after_test_mode_stops_tone() {
    let (state, _) = transition(init(), cycle(&["A"], true));
    let (state, effects) = transition(state, cycle(&["A"], false));
    assert!(!state.alarm_active);
    assert_eq!(
        effects,
        vec![
            Effect::StopTone,
            Effect::ShowVisualAlert {
                cameras: vec!["A".to_string()]
            }
        ]
    );
}

#[test]
fn test_detection_stopped_suppresses_everything() {
    let (state, _) = transition(init(), cycle(&["A"], true));
    let (state, effects) = transition(state, Event::DetectionStopped);
    assert!(!state.alarm_active);
    assert_eq!(effects, vec![Effect::DismissVisualAlert, Effect::StopTone]);
}
