//! Deploy/save workflow

pub mod classify;
pub mod progress;
pub mod workflow;

pub use classify::{classify, DeployFailure, DeployMode};
pub use progress::{simulated_percent, DeployProgressState, DeploySettings, Phase};
pub use workflow::{DeployOutcome, DeployWorkflow};
