//! Scenario scripting.
//!
//! A scenario is a named, seeded sequence of timed user inputs. The
//! predefined set mirrors the scenario picker of the visualization;
//! `random` generates a seeded sequence for fuzz-style exploration.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use beredskap_core::model::{Input, StandbyMode};

use crate::error::ScenarioError;

/// Names accepted by [`Scenario::predefined`].
pub const PREDEFINED_SCENARIOS: &[&str] = &[
    "primary-failure",
    "load-balancing",
    "disaster-recovery",
    "maintenance",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Virtual time at which the input is applied, ms since start.
    pub at_ms: u64,
    pub input: Input,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    /// Initial standby mode; servers start in the mode's canonical posture.
    pub mode: StandbyMode,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Looks up one of the built-in scripted scenarios.
    pub fn predefined(name: &str) -> Result<Self, ScenarioError> {
        let scenario = match name {
            // Warm standby: primary fails, failover completes at t=5000,
            // primary recovers afterwards.
            "primary-failure" => Self {
                name: name.into(),
                seed: 0,
                mode: StandbyMode::Warm,
                steps: vec![
                    step(1000, Input::SetPrimaryHealth(false)),
                    step(8000, Input::SetPrimaryHealth(true)),
                ],
            },
            // Hot standby, both servers serving. A short health blip is
            // cancelled before the 2000 ms countdown elapses.
            "load-balancing" => Self {
                name: name.into(),
                seed: 0,
                mode: StandbyMode::Hot,
                steps: vec![
                    step(2000, Input::SetPrimaryHealth(false)),
                    step(3500, Input::SetPrimaryHealth(true)),
                ],
            },
            // Cold standby: full region outage, secondary comes up after
            // the 7000 ms cold start, primary is restored later.
            "disaster-recovery" => Self {
                name: name.into(),
                seed: 0,
                mode: StandbyMode::Cold,
                steps: vec![
                    step(500, Input::SetPrimaryPower(false)),
                    step(12_000, Input::SetPrimaryPower(true)),
                    step(13_000, Input::SetSecondaryPower(false)),
                ],
            },
            // Hot standby: primary taken down on purpose, traffic moves to
            // the secondary, primary returns after the window.
            "maintenance" => Self {
                name: name.into(),
                seed: 0,
                mode: StandbyMode::Hot,
                steps: vec![
                    step(1000, Input::SetPrimaryPower(false)),
                    step(9000, Input::SetPrimaryPower(true)),
                ],
            },
            other => return Err(ScenarioError::UnknownScenario(other.into())),
        };
        Ok(scenario)
    }

    /// Generates a seeded random input sequence.
    pub fn random(seed: u64, step_count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut at_ms = 0;
        let mut steps = Vec::with_capacity(step_count);
        for _ in 0..step_count {
            at_ms += rng.random_range(250..=1500);
            let input = match rng.random_range(0..5) {
                0 => Input::SetMode(match rng.random_range(0..3) {
                    0 => StandbyMode::Cold,
                    1 => StandbyMode::Warm,
                    _ => StandbyMode::Hot,
                }),
                1 => Input::SetPrimaryPower(rng.random_bool(0.5)),
                2 => Input::SetPrimaryHealth(rng.random_bool(0.5)),
                3 => Input::SetSecondaryPower(rng.random_bool(0.5)),
                _ => Input::SetSecondaryHealth(rng.random_bool(0.5)),
            };
            steps.push(step(at_ms, input));
        }
        Self {
            name: format!("random-{seed}"),
            seed,
            mode: StandbyMode::Warm,
            steps,
        }
    }

    /// Loads a scenario from a YAML file.
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Virtual time of the last scripted input.
    pub fn duration_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.at_ms).max().unwrap_or(0)
    }
}

fn step(at_ms: u64, input: Input) -> ScenarioStep {
    ScenarioStep { at_ms, input }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_predefined_names_resolve() {
        for name in PREDEFINED_SCENARIOS {
            let scenario = Scenario::predefined(name).unwrap();
            assert_eq!(&scenario.name, name);
            assert!(!scenario.steps.is_empty());
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            Scenario::predefined("meteor-strike"),
            Err(ScenarioError::UnknownScenario(_))
        ));
    }

    #[test]
    fn random_is_deterministic_per_seed() {
        let a = Scenario::random(7, 20);
        let b = Scenario::random(7, 20);
        assert_eq!(a, b);
        let c = Scenario::random(8, 20);
        assert_ne!(a, c);
    }

    #[test]
    fn yaml_parses_back_into_the_same_scenario() {
        let scenario = Scenario::predefined("disaster-recovery").unwrap();
        let yaml = scenario.to_yaml().unwrap();
        let parsed: Scenario = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, scenario);
    }
}
