//! # beredskap-analysis
//!
//! Stateless calculators layered over the core data model: cost estimation,
//! MTTR, and performance comparison. Pure arithmetic, no simulation state.

pub mod cost;
pub mod error;
pub mod mttr;
pub mod perf;

pub use cost::{estimate_cost, CostEstimate, CostRequest, InstanceSize};
pub use error::AnalysisError;
pub use mttr::{compute_mttr, MttrInput};
pub use perf::{mode_benchmarks, project_performance, ModeBenchmark, PerfProjection};
