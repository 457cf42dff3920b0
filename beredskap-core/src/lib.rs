//! # beredskap-core
//!
//! Foundation layer for the standby/failover simulation.
//! Built with determinism as the primary design constraint: every state
//! change flows through explicit transition functions over a virtual clock.
//!
//! ### Key Submodules:
//! - `model`: Standby modes, server states, and user inputs
//! - `time`: `VirtualClock` using atomic counters + cancellable one-shot timer
//! - `timeline`: Capped, reverse-chronological event history
//! - `failover`: The failover state machine and its transition rules

pub mod failover;
pub mod model;
pub mod time;
pub mod timeline;

pub mod prelude {
    pub use crate::failover::*;
    pub use crate::model::*;
    pub use crate::time::*;
    pub use crate::timeline::*;
}

pub use failover::{evaluate_failover, FailoverDecision, FailoverSimulator};
pub use model::{Input, ServerRole, ServerState, StandbyMode, SystemState};
pub use time::VirtualClock;
pub use timeline::{EventCategory, TimelineEvent, TimelineLog};
