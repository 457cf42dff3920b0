//! Simulator configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Seed for random scenarios and deterministic replay.
    pub seed: u64,

    /// Timeline entries retained per machine (most recent first).
    #[validate(range(min = 1, message = "timeline capacity must be at least 1"))]
    pub timeline_capacity: usize,

    /// Virtual time allowed after the last scripted input so a pending
    /// failover can still fire. Must cover the cold-standby delay.
    #[validate(range(min = 7000, message = "grace must cover the 7000 ms cold delay"))]
    pub grace_ms: u64,

    /// Step count used when generating random scenarios.
    #[validate(range(min = 1, message = "random scenarios need at least one step"))]
    pub random_steps: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            timeline_capacity: 64,
            grace_ms: 10_000,
            random_steps: 25,
        }
    }
}
