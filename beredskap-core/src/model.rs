//! ## beredskap-core::model
//! **Standby modes, server states, and the user-facing input set**
//!
//! The whole simulation is driven by three enum-like inputs: the standby
//! mode and the power/health switches of the two servers. Everything here
//! is `Copy` and serializable so scenarios can be scripted from YAML.

use serde::{Deserialize, Serialize};

/// Readiness posture of the secondary server relative to the primary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandbyMode {
    /// Secondary is offline and only starts when the primary fails.
    Cold,
    /// Secondary is running but not processing requests until promoted.
    Warm,
    /// Both servers are active and processing requests simultaneously.
    Hot,
}

impl StandbyMode {
    /// Delay between primary failure and secondary activation.
    pub const fn failover_delay_ms(self) -> u64 {
        match self {
            StandbyMode::Cold => 7000,
            StandbyMode::Warm => 4000,
            StandbyMode::Hot => 2000,
        }
    }

    /// Health-check interval shown alongside the mode.
    pub const fn check_interval_secs(self) -> u64 {
        match self {
            StandbyMode::Cold => 7,
            StandbyMode::Warm => 4,
            StandbyMode::Hot => 2,
        }
    }

    /// Whether the secondary is normally powered in this mode.
    pub const fn secondary_normally_on(self) -> bool {
        !matches!(self, StandbyMode::Cold)
    }

    pub const fn label(self) -> &'static str {
        match self {
            StandbyMode::Cold => "cold",
            StandbyMode::Warm => "warm",
            StandbyMode::Hot => "hot",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            StandbyMode::Cold => {
                "Secondary server is offline and only starts when the primary fails."
            }
            StandbyMode::Warm => {
                "Secondary server is running but not processing requests until promoted."
            }
            StandbyMode::Hot => {
                "Both servers are active and processing requests simultaneously."
            }
        }
    }
}

/// Which of the two servers an operation targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerRole {
    Primary,
    Secondary,
}

/// Power and health switches of a single server.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerState {
    pub on: bool,
    pub healthy: bool,
}

impl ServerState {
    pub const fn new(on: bool, healthy: bool) -> Self {
        Self { on, healthy }
    }

    /// A server is down when it is powered off or unhealthy.
    pub const fn is_down(self) -> bool {
        !self.on || !self.healthy
    }

    pub const fn status_label(self) -> &'static str {
        if !self.on {
            "Offline"
        } else if self.healthy {
            "Healthy"
        } else {
            "Unhealthy"
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Full simulation state: mode plus both servers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    pub mode: StandbyMode,
    pub primary: ServerState,
    pub secondary: ServerState,
}

impl SystemState {
    /// Canonical starting state for a given mode: primary up and healthy,
    /// secondary powered per the mode's posture.
    pub fn initial(mode: StandbyMode) -> Self {
        Self {
            mode,
            primary: ServerState::default(),
            secondary: ServerState::new(mode.secondary_normally_on(), true),
        }
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::initial(StandbyMode::Cold)
    }
}

/// One user control change, as exposed by the UI switches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    SetMode(StandbyMode),
    SetPrimaryPower(bool),
    SetPrimaryHealth(bool),
    SetSecondaryPower(bool),
    SetSecondaryHealth(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failover_delays_match_modes() {
        assert_eq!(StandbyMode::Cold.failover_delay_ms(), 7000);
        assert_eq!(StandbyMode::Warm.failover_delay_ms(), 4000);
        assert_eq!(StandbyMode::Hot.failover_delay_ms(), 2000);
    }

    #[test]
    fn down_means_off_or_unhealthy() {
        assert!(ServerState::new(false, true).is_down());
        assert!(ServerState::new(true, false).is_down());
        assert!(!ServerState::new(true, true).is_down());
    }

    #[test]
    fn initial_state_powers_secondary_per_mode() {
        assert!(!SystemState::initial(StandbyMode::Cold).secondary.on);
        assert!(SystemState::initial(StandbyMode::Warm).secondary.on);
        assert!(SystemState::initial(StandbyMode::Hot).secondary.on);
    }
}
