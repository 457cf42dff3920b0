//! ## beredskap-core::failover
//! **The failover state machine**
//!
//! A pure state-transition core over `SystemState` plus one cancellable
//! one-shot timer. Invariant: the timer is armed iff the primary is down
//! (off or unhealthy) and the secondary has not yet been activated for the
//! current failure episode. Any input change that restores the primary or
//! switches the standby mode cancels the pending deadline before it fires.

use tracing::debug;

use crate::model::{Input, ServerState, StandbyMode, SystemState};
use crate::time::{OneShotTimer, VirtualClock, NANOS_PER_MILLI};
use crate::timeline::{EventCategory, TimelineEvent, TimelineLog};

/// Outcome of re-evaluating the failover trigger after an input change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailoverDecision {
    /// No countdown should be pending.
    Cancel,
    /// Arm (or re-arm) the countdown with this delay.
    Schedule { delay_ms: u64 },
}

/// Pure trigger evaluation: a countdown is pending exactly when the primary
/// is down and the current episode has not already completed a failover.
pub fn evaluate_failover(
    mode: StandbyMode,
    primary: ServerState,
    failover_completed: bool,
) -> FailoverDecision {
    if primary.is_down() && !failover_completed {
        FailoverDecision::Schedule {
            delay_ms: mode.failover_delay_ms(),
        }
    } else {
        FailoverDecision::Cancel
    }
}

/// Drives a single primary/secondary pair through mode changes, power and
/// health toggles, and the delayed failover action.
pub struct FailoverSimulator {
    clock: VirtualClock,
    state: SystemState,
    timer: OneShotTimer,
    timeline: TimelineLog,
    /// Set when the secondary was activated for the current failure episode;
    /// cleared when the primary comes back up.
    failover_completed: bool,
    /// Delay that is currently armed, mirrored from the last schedule.
    armed_delay_ms: Option<u64>,
    /// Armed delay of every completed failover, in completion order.
    completed_delays: Vec<u64>,
}

impl FailoverSimulator {
    pub fn new(clock: VirtualClock, timeline_capacity: usize) -> Self {
        Self::with_state(clock, SystemState::default(), timeline_capacity)
    }

    pub fn with_state(clock: VirtualClock, state: SystemState, timeline_capacity: usize) -> Self {
        let mut sim = Self {
            clock,
            state,
            timer: OneShotTimer::new(),
            timeline: TimelineLog::with_capacity(timeline_capacity),
            failover_completed: false,
            armed_delay_ms: None,
            completed_delays: Vec::new(),
        };
        // Uphold the timer invariant even for a state constructed mid-failure.
        sim.reevaluate();
        sim
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn timeline(&self) -> &TimelineLog {
        &self.timeline
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Completed failovers over the lifetime of this machine.
    pub fn failover_count(&self) -> u64 {
        self.completed_delays.len() as u64
    }

    /// Armed delay of each completed failover, in completion order.
    pub fn completed_delays(&self) -> &[u64] {
        &self.completed_delays
    }

    /// Whether the secondary was already activated for the current episode.
    pub fn failover_completed(&self) -> bool {
        self.failover_completed
    }

    pub fn is_failover_pending(&self) -> bool {
        self.timer.is_armed()
    }

    /// Remaining countdown in milliseconds, if one is armed.
    pub fn pending_failover_in_ms(&self) -> Option<u64> {
        self.timer
            .deadline_ms()
            .map(|deadline| deadline.saturating_sub(self.clock.now_ms()))
    }

    /// Absolute deadline of the pending failover, in clock nanoseconds.
    /// Lets a shared-clock driver step time deadline by deadline.
    pub fn pending_deadline_ns(&self) -> Option<u64> {
        self.timer.deadline_ns()
    }

    /// Applies one user input, logging the change and re-evaluating the
    /// failover trigger when (mode, primaryOn, primaryHealthy) changed.
    pub fn apply(&mut self, input: Input) {
        let trigger_before = self.trigger_tuple();
        debug!(?input, now_ms = self.now_ms(), "applying input");

        match input {
            Input::SetMode(mode) => {
                if self.state.mode != mode {
                    self.state.mode = mode;
                    self.log(
                        EventCategory::System,
                        format!("Standby type changed to {}", mode.label()),
                    );
                    // Cold standby keeps the secondary powered down,
                    // overriding any manual toggle.
                    if mode == StandbyMode::Cold && self.state.secondary.on {
                        self.state.secondary.on = false;
                        self.log(
                            EventCategory::System,
                            "Secondary server forced offline (cold standby)",
                        );
                    }
                }
            }
            Input::SetPrimaryPower(on) => {
                if self.state.primary.on != on {
                    self.state.primary.on = on;
                    self.log(
                        EventCategory::Primary,
                        if on {
                            "Primary server started"
                        } else {
                            "Primary server stopped"
                        },
                    );
                }
            }
            Input::SetPrimaryHealth(healthy) => {
                if self.state.primary.healthy != healthy {
                    self.state.primary.healthy = healthy;
                    let category = if healthy {
                        EventCategory::Primary
                    } else {
                        EventCategory::Error
                    };
                    self.log(
                        category,
                        format!(
                            "Primary server health: {}",
                            if healthy { "Healthy" } else { "Unhealthy" }
                        ),
                    );
                }
            }
            Input::SetSecondaryPower(on) => {
                if on && self.state.mode == StandbyMode::Cold {
                    // The cold posture owns the secondary's power switch;
                    // only the failover action may start it.
                    self.log(
                        EventCategory::System,
                        "Manual secondary start ignored (cold standby)",
                    );
                } else if self.state.secondary.on != on {
                    self.state.secondary.on = on;
                    self.log(
                        EventCategory::Secondary,
                        if on {
                            "Secondary server started"
                        } else {
                            "Secondary server stopped"
                        },
                    );
                }
            }
            Input::SetSecondaryHealth(healthy) => {
                if self.state.secondary.healthy != healthy {
                    self.state.secondary.healthy = healthy;
                    let category = if healthy {
                        EventCategory::Secondary
                    } else {
                        EventCategory::Error
                    };
                    self.log(
                        category,
                        format!(
                            "Secondary server health: {}",
                            if healthy { "Healthy" } else { "Unhealthy" }
                        ),
                    );
                }
            }
        }

        if self.trigger_tuple() != trigger_before {
            self.reevaluate();
        }
    }

    /// Advances virtual time and fires the failover action if its deadline
    /// passes within the window. The advance is split at the deadline so the
    /// activation event carries the deadline's timestamp, not the window end.
    pub fn advance_ms(&mut self, delta_ms: u64) {
        let target_ns = self.clock.now_ns() + delta_ms * NANOS_PER_MILLI;
        if let Some(deadline_ns) = self.timer.deadline_ns() {
            if deadline_ns <= target_ns {
                let to_deadline = deadline_ns.saturating_sub(self.clock.now_ns());
                self.clock.advance(to_deadline);
                self.poll();
            }
        }
        let remainder = target_ns.saturating_sub(self.clock.now_ns());
        self.clock.advance(remainder);
        self.poll();
    }

    /// Fires the pending failover if its deadline has passed. Used directly
    /// when several machines share one clock. Returns true when a failover
    /// completed.
    pub fn poll(&mut self) -> bool {
        if self.timer.fire_expired(&self.clock).is_none() {
            return false;
        }
        // The trigger condition is re-checked at expiry; an expired deadline
        // whose precondition no longer holds must not mutate state.
        if !self.state.primary.is_down() {
            return false;
        }
        let was_on = self.state.secondary.on;
        self.state.secondary.on = true;
        self.failover_completed = true;
        let delay = self
            .armed_delay_ms
            .take()
            .unwrap_or_else(|| self.state.mode.failover_delay_ms());
        self.completed_delays.push(delay);
        debug!(now_ms = self.now_ms(), "failover complete");
        self.log(
            EventCategory::Secondary,
            if was_on {
                "Secondary server already active, failover complete"
            } else {
                "Secondary server activated, failover complete"
            },
        );
        true
    }

    fn trigger_tuple(&self) -> (StandbyMode, bool, bool) {
        (
            self.state.mode,
            self.state.primary.on,
            self.state.primary.healthy,
        )
    }

    fn reevaluate(&mut self) {
        match evaluate_failover(self.state.mode, self.state.primary, self.failover_completed) {
            FailoverDecision::Cancel => {
                if self.timer.is_armed() {
                    // Armed implies an open episode, so reaching Cancel here
                    // means the primary recovered before the deadline.
                    self.timer.cancel();
                    self.armed_delay_ms = None;
                    self.log(
                        EventCategory::System,
                        "Primary server recovered, failover cancelled",
                    );
                }
                if !self.state.primary.is_down() {
                    self.failover_completed = false;
                }
            }
            FailoverDecision::Schedule { delay_ms } => {
                self.timer.cancel();
                self.timer.schedule(&self.clock, delay_ms);
                self.armed_delay_ms = Some(delay_ms);
                self.log(
                    EventCategory::Error,
                    format!(
                        "Primary server failure detected, failover in {} ms ({} standby)",
                        delay_ms,
                        self.state.mode.label()
                    ),
                );
            }
        }
    }

    fn log(&mut self, category: EventCategory, message: impl Into<String>) {
        self.timeline
            .push(TimelineEvent::new(self.clock.now_ms(), category, message));
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::timeline::DEFAULT_TIMELINE_CAPACITY;

    fn machine(mode: StandbyMode) -> FailoverSimulator {
        FailoverSimulator::with_state(
            VirtualClock::new(0),
            SystemState::initial(mode),
            DEFAULT_TIMELINE_CAPACITY,
        )
    }

    #[test]
    fn unhealthy_primary_arms_timer_with_mode_delay() {
        for (mode, delay) in [
            (StandbyMode::Cold, 7000),
            (StandbyMode::Warm, 4000),
            (StandbyMode::Hot, 2000),
        ] {
            let mut sim = machine(mode);
            sim.apply(Input::SetPrimaryHealth(false));
            assert_eq!(sim.pending_failover_in_ms(), Some(delay), "{mode:?}");
        }
    }

    #[test]
    fn recovery_before_deadline_leaves_secondary_untouched() {
        let mut sim = machine(StandbyMode::Cold);
        assert!(!sim.state().secondary.on);

        sim.apply(Input::SetPrimaryHealth(false));
        sim.advance_ms(6000);
        sim.apply(Input::SetPrimaryHealth(true));
        assert!(!sim.is_failover_pending());

        // Past the original deadline: the cancelled timer must not apply.
        sim.advance_ms(5000);
        assert!(!sim.state().secondary.on);
    }

    #[test]
    fn warm_to_cold_while_down_forces_secondary_off() {
        let mut sim = machine(StandbyMode::Warm);
        sim.apply(Input::SetPrimaryHealth(false));
        sim.advance_ms(4000);
        assert!(sim.state().secondary.on);

        sim.apply(Input::SetMode(StandbyMode::Cold));
        assert!(!sim.state().secondary.on);
        // The episode already failed over; cold must not re-arm.
        assert!(!sim.is_failover_pending());
    }

    #[test]
    fn rapid_health_toggles_measure_delay_from_last_toggle() {
        let mut sim = machine(StandbyMode::Warm);
        sim.apply(Input::SetPrimaryHealth(false));
        sim.advance_ms(1000);
        sim.apply(Input::SetPrimaryHealth(true));
        sim.advance_ms(500);
        sim.apply(Input::SetPrimaryHealth(false));

        assert_eq!(sim.pending_failover_in_ms(), Some(4000));

        // The first countdown (would end at t=4000) must not fire.
        sim.advance_ms(3000);
        assert_eq!(sim.failover_count(), 0);
        sim.advance_ms(1000);
        assert_eq!(sim.failover_count(), 1);
        assert!(sim.state().secondary.on);
    }

    #[test]
    fn hot_power_failure_activates_secondary_at_two_seconds() {
        let mut sim = FailoverSimulator::with_state(
            VirtualClock::new(0),
            SystemState {
                mode: StandbyMode::Hot,
                primary: ServerState::new(true, true),
                secondary: ServerState::new(false, true),
            },
            DEFAULT_TIMELINE_CAPACITY,
        );
        sim.apply(Input::SetPrimaryPower(false));
        sim.advance_ms(1999);
        assert!(!sim.state().secondary.on);

        sim.advance_ms(1);
        assert!(sim.state().secondary.on);
        let activation = sim
            .timeline()
            .iter()
            .find(|e| e.message.contains("failover complete"))
            .expect("activation event");
        assert!(activation.timestamp_ms >= 2000);
        assert_eq!(activation.category, EventCategory::Secondary);
        assert_eq!(sim.failover_count(), 1);
    }

    #[test]
    fn switching_to_cold_overrides_manual_secondary_start() {
        let mut sim = machine(StandbyMode::Warm);
        sim.apply(Input::SetSecondaryPower(true));
        assert!(sim.state().secondary.on);

        sim.apply(Input::SetMode(StandbyMode::Cold));
        assert!(!sim.state().secondary.on);
    }

    #[test]
    fn cold_ignores_manual_secondary_start() {
        let mut sim = machine(StandbyMode::Cold);
        sim.apply(Input::SetSecondaryPower(true));
        assert!(!sim.state().secondary.on);
        assert!(sim
            .timeline()
            .latest()
            .unwrap()
            .message
            .contains("ignored"));
    }

    #[test]
    fn mode_switch_mid_countdown_restarts_under_new_delay() {
        let mut sim = machine(StandbyMode::Cold);
        sim.apply(Input::SetPrimaryPower(false));
        sim.advance_ms(3000);
        assert_eq!(sim.pending_failover_in_ms(), Some(4000));

        sim.apply(Input::SetMode(StandbyMode::Hot));
        assert_eq!(sim.pending_failover_in_ms(), Some(2000));

        sim.advance_ms(2000);
        assert!(sim.state().secondary.on);
    }

    #[test]
    fn already_active_secondary_still_logs_failover_complete() {
        // Hot standby starts with the secondary on; activation is a no-op
        // but the completion message must match the activated phrasing.
        let mut sim = machine(StandbyMode::Hot);
        sim.apply(Input::SetPrimaryHealth(false));
        sim.advance_ms(2000);
        assert_eq!(sim.failover_count(), 1);

        let activation = sim
            .timeline()
            .iter()
            .find(|e| e.message.contains("failover complete"))
            .expect("activation event");
        assert!(activation.message.contains("already active"));
        assert_eq!(activation.timestamp_ms, 2000);
    }

    #[test]
    fn secondary_toggles_do_not_disturb_pending_countdown() {
        let mut sim = machine(StandbyMode::Warm);
        sim.apply(Input::SetPrimaryHealth(false));
        sim.advance_ms(3000);
        sim.apply(Input::SetSecondaryHealth(false));
        sim.apply(Input::SetSecondaryHealth(true));
        assert_eq!(sim.pending_failover_in_ms(), Some(1000));
    }

    #[test]
    fn new_episode_after_recovery_arms_again() {
        let mut sim = machine(StandbyMode::Hot);
        sim.apply(Input::SetPrimaryHealth(false));
        sim.advance_ms(2000);
        assert_eq!(sim.failover_count(), 1);

        sim.apply(Input::SetPrimaryHealth(true));
        assert!(!sim.failover_completed());

        sim.apply(Input::SetPrimaryHealth(false));
        assert_eq!(sim.pending_failover_in_ms(), Some(2000));
        sim.advance_ms(2000);
        assert_eq!(sim.failover_count(), 2);
    }

    fn input_strategy() -> impl Strategy<Value = Input> {
        prop_oneof![
            prop_oneof![
                Just(StandbyMode::Cold),
                Just(StandbyMode::Warm),
                Just(StandbyMode::Hot)
            ]
            .prop_map(Input::SetMode),
            any::<bool>().prop_map(Input::SetPrimaryPower),
            any::<bool>().prop_map(Input::SetPrimaryHealth),
            any::<bool>().prop_map(Input::SetSecondaryPower),
            any::<bool>().prop_map(Input::SetSecondaryHealth),
        ]
    }

    proptest! {
        /// The timer invariant holds under arbitrary input/advance sequences:
        /// armed iff the primary is down and the episode has not failed over.
        #[test]
        fn timer_invariant_holds(steps in prop::collection::vec((input_strategy(), 0u64..9000), 0..40)) {
            let mut sim = machine(StandbyMode::Warm);
            for (input, advance) in steps {
                sim.apply(input);
                prop_assert_eq!(
                    sim.is_failover_pending(),
                    sim.state().primary.is_down() && !sim.failover_completed()
                );
                sim.advance_ms(advance);
                prop_assert_eq!(
                    sim.is_failover_pending(),
                    sim.state().primary.is_down() && !sim.failover_completed()
                );
            }
        }
    }
}
