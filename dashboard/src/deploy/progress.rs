//! Deploy progress state and simulated progress curve
//!
//! The backend reports nothing until the start call returns, so the percentage
//! shown while waiting is approximate and driven only by elapsed time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Highest percentage shown before the backend answers
pub const SIMULATED_CAP: f64 = 95.0;

/// Deploy workflow timing settings
#[derive(Debug, Clone)]
pub struct DeploySettings {
    /// Interval between progress updates
    pub tick_interval: Duration,

    /// Pause at 100% before the success notification
    pub completion_delay: Duration,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            completion_delay: Duration::from_millis(500),
        }
    }
}

/// Simulated completion percentage after `elapsed` seconds
///
/// Piecewise and decelerating: 10%/s up to 50% at 5s, 2.5%/s up to 75% at
/// 15s, 0.5%/s up to 90% at 45s, then an exponential approach capped at 95%.
pub fn simulated_percent(elapsed: f64) -> f64 {
    let t = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
    let percent = if t <= 5.0 {
        10.0 * t
    } else if t <= 15.0 {
        50.0 + 2.5 * (t - 5.0)
    } else if t <= 45.0 {
        75.0 + (t - 15.0) / 2.0
    } else {
        90.0 + 5.0 * (1.0 - (-(t - 45.0) / 30.0).exp())
    };
    percent.min(SIMULATED_CAP)
}

/// Human readable stage for the elapsed time
pub fn status_message(elapsed: f64) -> &'static str {
    match elapsed {
        t if t < 5.0 => "Submitting configuration...",
        t if t < 15.0 => "Creating honeypot...",
        t if t < 45.0 => "Starting service...",
        _ => "Still working, large images can take a while...",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Start,
    Succeed,
    Fail,
    Reset,
}

/// Progress of the deploy in flight, if any
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployProgressState {
    pub phase: Phase,
    /// Seconds since submission
    pub elapsed: f64,
    pub simulated_percent: f64,
    pub status_message: String,
}

impl DeployProgressState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Update elapsed time and the derived percentage
    pub fn tick(&mut self, elapsed: f64) {
        if self.phase != Phase::Running {
            return;
        }
        self.elapsed = elapsed;
        self.simulated_percent = self.simulated_percent.max(simulated_percent(elapsed));
        self.status_message = status_message(elapsed).to_string();
    }

    /// Apply an event; invalid transitions are rejected
    pub fn process(&mut self, event: ProgressEvent) -> Result<(), String> {
        match (self.phase, event) {
            (Phase::Idle, ProgressEvent::Start) => {
                *self = Self {
                    phase: Phase::Running,
                    elapsed: 0.0,
                    simulated_percent: 0.0,
                    status_message: status_message(0.0).to_string(),
                };
            }
            (Phase::Running, ProgressEvent::Succeed) => {
                self.phase = Phase::Succeeded;
                self.simulated_percent = 100.0;
                self.status_message = "Honeypot is up".to_string();
            }
            (Phase::Running, ProgressEvent::Fail) => {
                self.phase = Phase::Failed;
                self.status_message = "Deployment failed".to_string();
            }
            (_, ProgressEvent::Reset) => *self = Self::idle(),
            (phase, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", phase, event));
            }
        }
        Ok(())
    }
}
