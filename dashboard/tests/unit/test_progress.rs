//! Deploy progress state machine tests

use honeydash::deploy::progress::{
    simulated_percent, status_message, DeployProgressState, Phase, ProgressEvent, SIMULATED_CAP,
};

#[test]
fn test_progress_initial_state() {
    let state = DeployProgressState::idle();
    assert_eq!(state.phase, Phase::Idle);
    assert!(!state.is_running());
    assert_eq!(state.simulated_percent, 0.0);
}

#[test]
fn test_progress_success_flow() {
    let mut state = DeployProgressState::idle();

    // Idle -> Running
    state.process(ProgressEvent::Start).unwrap();
    assert!(state.is_running());
    assert_eq!(state.status_message, "Submitting configuration...");

    state.tick(2.0);
    assert_eq!(state.simulated_percent, 20.0);

    // Running -> Succeeded
    state.process(ProgressEvent::Succeed).unwrap();
    assert_eq!(state.phase, Phase::Succeeded);
    assert_eq!(state.simulated_percent, 100.0);
}

#[test]
fn test_progress_failure_keeps_last_percent() {
    let mut state = DeployProgressState::idle();
    state.process(ProgressEvent::Start).unwrap();
    state.tick(15.0);
    state.process(ProgressEvent::Fail).unwrap();

    assert_eq!(state.phase, Phase::Failed);
    assert_eq!(state.simulated_percent, 75.0);
}

#[test]
fn test_progress_invalid_transitions() {
    let mut state = DeployProgressState::idle();
    assert!(state.process(ProgressEvent::Fail).is_err());

    state.process(ProgressEvent::Start).unwrap();
    assert!(state.process(ProgressEvent::Start).is_err());

    state.process(ProgressEvent::Succeed).unwrap();
    assert!(state.process(ProgressEvent::Fail).is_err());
    state.process(ProgressEvent::Reset).unwrap();
    assert_eq!(state.phase, Phase::Idle);
}

#[test]
fn test_percent_never_decreases_within_a_run() {
    let mut state = DeployProgressState::idle();
    state.process(ProgressEvent::Start).unwrap();
    state.tick(10.0);
    let before = state.simulated_percent;
    state.tick(3.0);
    assert_eq!(state.simulated_percent, before);
}

#[test]
fn test_long_waits_stay_below_cap() {
    assert!(simulated_percent(600.0) < SIMULATED_CAP + f64::EPSILON);
    assert!(simulated_percent(600.0) > 90.0);
    assert_eq!(status_message(120.0), "Still working, large images can take a while...");
}
