// beredskap-simulator/src/lib.rs

/*!
# Beredskap Simulator

Deterministic simulation and replay engine for the standby visualization.
It drives the core failover state machine over virtual time, so that a
scripted scenario always produces the same timeline and the same state hash.

## Key Components:
- **Scenario Engine:** Scripted, random, and YAML-loaded input sequences.
- **State Hashing:** BLAKE3 digest over inputs, timeline, and final state.
- **Replay:** Re-runs a recorded scenario and validates its hash.
- **Multi-Region:** Independent failover machines sharing one clock.
- **Pacing:** Optional wall-clock pacing that never changes virtual-time semantics.
*/

use std::time::Duration;

use blake3::Hasher;
use tracing::info;

use beredskap_core::failover::FailoverSimulator;
use beredskap_core::model::SystemState;
use beredskap_core::time::VirtualClock;
use beredskap_core::timeline::{TimelineEvent, DEFAULT_TIMELINE_CAPACITY};

pub mod error;
pub mod multi_region;
pub mod replay;
pub mod scenario;

pub use error::ScenarioError;
pub use multi_region::MultiRegionScenario;
pub use scenario::{Scenario, ScenarioStep, PREDEFINED_SCENARIOS};

/// Virtual time allowed after the last scripted input so that a pending
/// failover can still fire. Covers the longest (cold) delay.
pub const DEFAULT_GRACE_MS: u64 = 10_000;

/// Tick size used when pacing a run against the wall clock.
const PACED_TICK_MS: u64 = 100;

/// Outcome of a scenario run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub scenario: String,
    /// Hex BLAKE3 digest of the run; identical for identical runs.
    pub state_hash: String,
    pub final_state: SystemState,
    /// Retained timeline, newest-first.
    pub timeline: Vec<TimelineEvent>,
    pub failovers: u64,
    /// Armed delay of each completed failover, in completion order.
    pub completed_delays: Vec<u64>,
    pub duration_ms: u64,
}

/// Ties the failover machine to a state hasher and runs scenarios to
/// completion over virtual time.
pub struct Simulator {
    machine: FailoverSimulator,
    state_hasher: Hasher,
    grace_ms: u64,
}

impl Simulator {
    pub fn new(scenario: &Scenario) -> Self {
        Self::with_settings(scenario, DEFAULT_TIMELINE_CAPACITY, DEFAULT_GRACE_MS)
    }

    pub fn with_settings(scenario: &Scenario, timeline_capacity: usize, grace_ms: u64) -> Self {
        let clock = VirtualClock::new(0);
        let machine = FailoverSimulator::with_state(
            clock,
            SystemState::initial(scenario.mode),
            timeline_capacity,
        );
        let mut state_hasher = Hasher::new();
        state_hasher.update(scenario.name.as_bytes());
        state_hasher.update(&scenario.seed.to_le_bytes());
        Self {
            machine,
            state_hasher,
            grace_ms,
        }
    }

    /// Runs the scenario to completion and returns the report.
    pub fn run(mut self, scenario: &Scenario) -> RunReport {
        let mut steps: Vec<&ScenarioStep> = scenario.steps.iter().collect();
        steps.sort_by_key(|s| s.at_ms);

        for step in steps {
            let delta = step.at_ms.saturating_sub(self.machine.now_ms());
            self.machine.advance_ms(delta);
            self.apply_step(step);
        }
        self.machine.advance_ms(self.grace_ms);
        self.finish(scenario)
    }

    /// Runs the scenario paced against the wall clock, advancing virtual
    /// time in fixed ticks. `speed` > 1 runs faster than real time. The
    /// resulting report (and hash) is identical to an unpaced run of the
    /// same scenario only in its final state semantics, not tick granularity;
    /// use [`Simulator::run`] for hash validation.
    pub async fn run_paced(mut self, scenario: &Scenario, speed: f64) -> RunReport {
        let speed = if speed > 0.0 { speed } else { 1.0 };
        let end_ms = scenario.duration_ms() + self.grace_ms;
        let mut steps: Vec<&ScenarioStep> = scenario.steps.iter().collect();
        steps.sort_by_key(|s| s.at_ms);
        let mut pending = steps.into_iter().peekable();

        loop {
            while pending
                .peek()
                .is_some_and(|s| s.at_ms <= self.machine.now_ms())
            {
                let step = pending.next().unwrap();
                self.apply_step(step);
            }
            if self.machine.now_ms() >= end_ms {
                break;
            }
            let sleep_ms = (PACED_TICK_MS as f64 / speed).round() as u64;
            tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
            self.machine.advance_ms(PACED_TICK_MS);
        }
        self.finish(scenario)
    }

    fn apply_step(&mut self, step: &ScenarioStep) {
        self.state_hasher.update(&step.at_ms.to_le_bytes());
        self.state_hasher
            .update(format!("{:?}", step.input).as_bytes());
        self.machine.apply(step.input);
    }

    fn finish(mut self, scenario: &Scenario) -> RunReport {
        for event in self.machine.timeline().iter() {
            self.state_hasher.update(&event.timestamp_ms.to_le_bytes());
            self.state_hasher
                .update(format!("{:?}", event.category).as_bytes());
            self.state_hasher.update(event.message.as_bytes());
        }
        self.state_hasher
            .update(format!("{:?}", self.machine.state()).as_bytes());

        let report = RunReport {
            scenario: scenario.name.clone(),
            state_hash: hex::encode(self.state_hasher.finalize().as_bytes()),
            final_state: self.machine.state(),
            timeline: self.machine.timeline().to_vec(),
            failovers: self.machine.failover_count(),
            completed_delays: self.machine.completed_delays().to_vec(),
            duration_ms: self.machine.now_ms(),
        };
        info!(
            scenario = %report.scenario,
            failovers = report.failovers,
            hash = %report.state_hash,
            "scenario run complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beredskap_core::model::StandbyMode;

    #[test]
    fn primary_failure_completes_one_failover() {
        let scenario = Scenario::predefined("primary-failure").unwrap();
        let report = Simulator::new(&scenario).run(&scenario);
        assert_eq!(report.failovers, 1);
        // Recovery after the failover leaves the secondary serving.
        assert!(report.final_state.secondary.on);
        assert!(report.final_state.primary.healthy);
    }

    #[test]
    fn load_balancing_blip_never_fails_over() {
        let scenario = Scenario::predefined("load-balancing").unwrap();
        let report = Simulator::new(&scenario).run(&scenario);
        assert_eq!(report.failovers, 0);
        assert_eq!(report.final_state.mode, StandbyMode::Hot);
    }

    #[test]
    fn disaster_recovery_cold_starts_the_secondary() {
        let scenario = Scenario::predefined("disaster-recovery").unwrap();
        let report = Simulator::new(&scenario).run(&scenario);
        assert_eq!(report.failovers, 1);
        let activation = report
            .timeline
            .iter()
            .find(|e| e.message.contains("failover complete"))
            .expect("activation event");
        // 500 ms outage start + 7000 ms cold delay.
        assert_eq!(activation.timestamp_ms, 7500);
    }

    #[test]
    fn identical_runs_produce_identical_hashes() {
        let scenario = Scenario::random(42, 30);
        let first = Simulator::new(&scenario).run(&scenario);
        let second = Simulator::new(&scenario).run(&scenario);
        assert_eq!(first.state_hash, second.state_hash);

        let other = Scenario::random(43, 30);
        let third = Simulator::new(&other).run(&other);
        assert_ne!(first.state_hash, third.state_hash);
    }

    #[tokio::test(start_paused = true)]
    async fn paced_run_reaches_the_same_final_state() {
        let scenario = Scenario::predefined("maintenance").unwrap();
        let unpaced = Simulator::new(&scenario).run(&scenario);
        let paced = Simulator::new(&scenario).run_paced(&scenario, 50.0).await;
        assert_eq!(paced.final_state, unpaced.final_state);
        assert_eq!(paced.failovers, unpaced.failovers);
    }
}
