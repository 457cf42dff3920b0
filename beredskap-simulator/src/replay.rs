//! Replay module.
//!
//! Re-runs a recorded scenario file deterministically and optionally
//! validates its state hash against a previously observed digest.

use std::path::Path;

use tracing::info;

use crate::error::ScenarioError;
use crate::scenario::Scenario;
use crate::{RunReport, Simulator};

/// Replays a scenario from a YAML file. When `expected_hash` is given, a
/// differing digest is reported as an error.
pub fn replay_scenario<P: AsRef<Path>>(
    path: P,
    expected_hash: Option<&str>,
) -> Result<RunReport, ScenarioError> {
    let scenario = Scenario::from_yaml_path(path)?;
    info!(scenario = %scenario.name, seed = scenario.seed, "replaying scenario");
    let report = Simulator::new(&scenario).run(&scenario);
    if let Some(expected) = expected_hash {
        if expected != report.state_hash {
            return Err(ScenarioError::HashMismatch {
                expected: expected.to_string(),
                actual: report.state_hash,
            });
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_scenario(name: &str) -> std::path::PathBuf {
        let scenario = Scenario::predefined(name).unwrap();
        let path = std::env::temp_dir().join(format!("beredskap-replay-{name}.yaml"));
        std::fs::write(&path, scenario.to_yaml().unwrap()).unwrap();
        path
    }

    #[test]
    fn replay_matches_a_direct_run() {
        let path = write_scenario("primary-failure");
        let replayed = replay_scenario(&path, None).unwrap();

        let scenario = Scenario::predefined("primary-failure").unwrap();
        let direct = Simulator::new(&scenario).run(&scenario);
        assert_eq!(replayed.state_hash, direct.state_hash);

        // Validation succeeds against the replay's own hash.
        replay_scenario(&path, Some(&direct.state_hash)).unwrap();
    }

    #[test]
    fn hash_mismatch_is_reported() {
        let path = write_scenario("maintenance");
        let result = replay_scenario(&path, Some("deadbeef"));
        assert!(matches!(result, Err(ScenarioError::HashMismatch { .. })));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = replay_scenario("/nonexistent/scenario.yaml", None);
        assert!(matches!(result, Err(ScenarioError::FileNotFound(_))));
    }
}
