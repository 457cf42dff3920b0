//! ## beredskap-core::time
//! **Virtual clock & cancellable one-shot timer**
//!
//! ### Expectations:
//! - Nanosecond resolution
//! - Seedable and deterministic
//! - Lock-free time access
//!
//! The clock is shared (cloned) between the simulator and any region
//! machines so a single `advance` moves every pending deadline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const NANOS_PER_MILLI: u64 = 1_000_000;

/// A simple virtual clock that advances in nanoseconds.
#[derive(Clone)]
pub struct VirtualClock {
    // Shared atomic counter representing the current simulation time.
    offset: Arc<AtomicU64>,
}

impl VirtualClock {
    /// Creates a new virtual clock with the given starting time.
    pub fn new(start_ns: u64) -> Self {
        Self {
            offset: Arc::new(AtomicU64::new(start_ns)),
        }
    }

    /// Returns the current virtual time in nanoseconds.
    #[inline]
    pub fn now_ns(&self) -> u64 {
        self.offset.load(Ordering::Acquire)
    }

    /// Returns the current virtual time in milliseconds.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ns() / NANOS_PER_MILLI
    }

    /// Advances the virtual clock by the given number of nanoseconds.
    #[inline]
    pub fn advance(&self, ns: u64) {
        self.offset.fetch_add(ns, Ordering::Release);
    }

    /// Advances the virtual clock by the given number of milliseconds.
    #[inline]
    pub fn advance_ms(&self, ms: u64) {
        self.advance(ms * NANOS_PER_MILLI);
    }
}

/// Identifier of a scheduled deadline. Scheduling returns a fresh handle;
/// a fired handle can be compared against the one held by the owner to
/// reject stale expirations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerHandle(u64);

/// A single cancellable one-shot deadline.
///
/// At most one deadline is armed at any time: scheduling replaces the
/// previous deadline, so the last write always wins.
#[derive(Debug, Default)]
pub struct OneShotTimer {
    next_id: u64,
    armed: Option<(TimerHandle, u64)>, // (handle, deadline_ns)
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer `delay_ms` from now, superseding any earlier deadline.
    pub fn schedule(&mut self, clock: &VirtualClock, delay_ms: u64) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let deadline = clock.now_ns() + delay_ms * NANOS_PER_MILLI;
        self.armed = Some((handle, deadline));
        handle
    }

    /// Disarms the timer. A cancelled deadline never fires.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ns().map(|d| d / NANOS_PER_MILLI)
    }

    pub fn deadline_ns(&self) -> Option<u64> {
        self.armed.map(|(_, deadline)| deadline)
    }

    /// Disarms and returns the handle if the deadline has passed.
    pub fn fire_expired(&mut self, clock: &VirtualClock) -> Option<TimerHandle> {
        match self.armed {
            Some((handle, deadline)) if clock.now_ns() >= deadline => {
                self.armed = None;
                Some(handle)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_value() {
        let clock = VirtualClock::new(100);
        assert_eq!(clock.now_ns(), 100);
    }

    #[test]
    fn clock_advance() {
        let clock = VirtualClock::new(0);
        clock.advance(500);
        assert_eq!(clock.now_ns(), 500);
        clock.advance_ms(1);
        assert_eq!(clock.now_ns(), 500 + NANOS_PER_MILLI);
    }

    #[test]
    fn timer_fires_only_after_deadline() {
        let clock = VirtualClock::new(0);
        let mut timer = OneShotTimer::new();
        let handle = timer.schedule(&clock, 10);

        clock.advance_ms(9);
        assert_eq!(timer.fire_expired(&clock), None);

        clock.advance_ms(1);
        assert_eq!(timer.fire_expired(&clock), Some(handle));
        assert!(!timer.is_armed());
    }

    #[test]
    fn reschedule_supersedes_previous_deadline() {
        let clock = VirtualClock::new(0);
        let mut timer = OneShotTimer::new();
        let first = timer.schedule(&clock, 10);
        clock.advance_ms(5);
        let second = timer.schedule(&clock, 10);
        assert_ne!(first, second);

        // The first deadline (t=10) must not fire.
        clock.advance_ms(6);
        assert_eq!(timer.fire_expired(&clock), None);

        clock.advance_ms(4);
        assert_eq!(timer.fire_expired(&clock), Some(second));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let clock = VirtualClock::new(0);
        let mut timer = OneShotTimer::new();
        timer.schedule(&clock, 10);
        timer.cancel();
        clock.advance_ms(100);
        assert_eq!(timer.fire_expired(&clock), None);
    }
}
