//! ## beredskap-core::timeline
//! **Capped event history, read back newest-first**
//!
//! Mirrors the on-screen timeline and system log: append-only, most recent
//! N entries retained, reverse chronological iteration.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMELINE_CAPACITY: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Primary,
    Secondary,
    System,
    Error,
}

impl EventCategory {
    pub const fn label(self) -> &'static str {
        match self {
            EventCategory::Primary => "primary",
            EventCategory::Secondary => "secondary",
            EventCategory::System => "system",
            EventCategory::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Virtual time of the event, milliseconds since simulation start.
    pub timestamp_ms: u64,
    pub message: String,
    pub category: EventCategory,
}

impl TimelineEvent {
    pub fn new(timestamp_ms: u64, category: EventCategory, message: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            message: message.into(),
            category,
        }
    }
}

/// Append-only log keeping the most recent `capacity` events.
#[derive(Debug)]
pub struct TimelineLog {
    events: VecDeque<TimelineEvent>,
    capacity: usize,
}

impl TimelineLog {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "timeline capacity must be positive");
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: TimelineEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent event, if any.
    pub fn latest(&self) -> Option<&TimelineEvent> {
        self.events.back()
    }

    /// Iterates newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().rev()
    }

    /// Snapshot of the retained events, newest-first.
    pub fn to_vec(&self) -> Vec<TimelineEvent> {
        self.iter().cloned().collect()
    }
}

impl Default for TimelineLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TIMELINE_CAPACITY)
    }
}
