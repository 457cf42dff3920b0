//! Multi-region disaster recovery scenario.
//!
//! A fleet of named regions, each with its own independent failover machine,
//! all sharing one virtual clock. `simulate_disaster` takes every primary
//! down at once; each region then fails over under its own mode delay.

use beredskap_core::failover::FailoverSimulator;
use beredskap_core::model::{Input, ServerRole, StandbyMode, SystemState};
use beredskap_core::time::{VirtualClock, NANOS_PER_MILLI};
use beredskap_core::timeline::{TimelineLog, DEFAULT_TIMELINE_CAPACITY};

pub const DEFAULT_REGIONS: &[&str] = &["US East", "Europe"];

pub struct Region {
    name: String,
    machine: FailoverSimulator,
}

impl Region {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SystemState {
        self.machine.state()
    }

    pub fn timeline(&self) -> &TimelineLog {
        self.machine.timeline()
    }

    pub fn is_failover_pending(&self) -> bool {
        self.machine.is_failover_pending()
    }

    pub fn failover_count(&self) -> u64 {
        self.machine.failover_count()
    }
}

pub struct MultiRegionScenario {
    clock: VirtualClock,
    regions: Vec<Region>,
}

impl MultiRegionScenario {
    pub fn new<S: AsRef<str>>(names: &[S], mode: StandbyMode, timeline_capacity: usize) -> Self {
        let clock = VirtualClock::new(0);
        let regions = names
            .iter()
            .map(|name| Region {
                name: name.as_ref().to_string(),
                machine: FailoverSimulator::with_state(
                    clock.clone(),
                    SystemState::initial(mode),
                    timeline_capacity,
                ),
            })
            .collect();
        Self { clock, regions }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Flips the power switch of one server; returns the resulting state.
    pub fn toggle_power(&mut self, region: usize, role: ServerRole) -> Option<bool> {
        let machine = &mut self.regions.get_mut(region)?.machine;
        let state = machine.state();
        let input = match role {
            ServerRole::Primary => Input::SetPrimaryPower(!state.primary.on),
            ServerRole::Secondary => Input::SetSecondaryPower(!state.secondary.on),
        };
        machine.apply(input);
        let state = machine.state();
        Some(match role {
            ServerRole::Primary => state.primary.on,
            ServerRole::Secondary => state.secondary.on,
        })
    }

    /// Flips the health switch of one server; returns the resulting state.
    pub fn toggle_health(&mut self, region: usize, role: ServerRole) -> Option<bool> {
        let machine = &mut self.regions.get_mut(region)?.machine;
        let state = machine.state();
        let input = match role {
            ServerRole::Primary => Input::SetPrimaryHealth(!state.primary.healthy),
            ServerRole::Secondary => Input::SetSecondaryHealth(!state.secondary.healthy),
        };
        machine.apply(input);
        let state = machine.state();
        Some(match role {
            ServerRole::Primary => state.primary.healthy,
            ServerRole::Secondary => state.secondary.healthy,
        })
    }

    /// Takes every region's primary down at once, off and unhealthy.
    pub fn simulate_disaster(&mut self) {
        for region in &mut self.regions {
            region.machine.apply(Input::SetPrimaryPower(false));
            region.machine.apply(Input::SetPrimaryHealth(false));
        }
    }

    /// Advances the shared clock, stopping at every pending deadline within
    /// the window so each region's activation event carries the deadline
    /// timestamp, not the window end.
    pub fn advance_ms(&mut self, delta_ms: u64) {
        let target_ns = self.clock.now_ns() + delta_ms * NANOS_PER_MILLI;
        loop {
            let next_deadline = self
                .regions
                .iter()
                .filter_map(|r| r.machine.pending_deadline_ns())
                .filter(|&deadline| deadline <= target_ns)
                .min();
            let Some(deadline_ns) = next_deadline else {
                break;
            };
            self.clock
                .advance(deadline_ns.saturating_sub(self.clock.now_ns()));
            for region in &mut self.regions {
                region.machine.poll();
            }
        }
        self.clock
            .advance(target_ns.saturating_sub(self.clock.now_ns()));
        for region in &mut self.regions {
            region.machine.poll();
        }
    }
}

impl Default for MultiRegionScenario {
    fn default() -> Self {
        Self::new(DEFAULT_REGIONS, StandbyMode::Hot, DEFAULT_TIMELINE_CAPACITY)
    }
}
