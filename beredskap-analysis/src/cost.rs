//! ## beredskap-analysis::cost
//! **Cost estimation for a primary/secondary pair**
//!
//! Compute cost is the sum over powered servers of hourly rate x hours.
//! A cold standby whose secondary is off is billed at 10% of one active
//! instance (kept provisioned but not running). Storage accrues per GB-hour
//! and network is a flat per-GB transfer charge over the horizon.

use serde::{Deserialize, Serialize};

use beredskap_core::model::StandbyMode;

use crate::error::AnalysisError;

/// Accrued cost of the cold standby's idle secondary, as a fraction of one
/// active instance.
pub const COLD_STANDBY_SURCHARGE: f64 = 0.1;

pub const DEFAULT_STORAGE_RATE_PER_GB_HOUR: f64 = 0.0001;
pub const DEFAULT_NETWORK_RATE_PER_GB: f64 = 0.09;

/// Interval between samples of the cumulative cost series.
const SERIES_STEP_HOURS: u32 = 24;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceSize {
    Small,
    Medium,
    Large,
}

impl InstanceSize {
    pub const fn hourly_rate(self) -> f64 {
        match self {
            InstanceSize::Small => 0.10,
            InstanceSize::Medium => 0.20,
            InstanceSize::Large => 0.40,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            InstanceSize::Small => "small",
            InstanceSize::Medium => "medium",
            InstanceSize::Large => "large",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CostRequest {
    pub mode: StandbyMode,
    pub primary_on: bool,
    pub secondary_on: bool,
    pub size: InstanceSize,
    /// Estimate horizon in hours.
    pub hours: u32,
    pub storage_gb: f64,
    pub network_gb: f64,
    pub storage_rate_per_gb_hour: f64,
    pub network_rate_per_gb: f64,
}

impl CostRequest {
    /// 30-day estimate for a given posture with default rates and no
    /// storage or transfer.
    pub fn monthly(mode: StandbyMode, size: InstanceSize) -> Self {
        Self {
            mode,
            primary_on: true,
            secondary_on: mode.secondary_normally_on(),
            size,
            hours: 720,
            storage_gb: 0.0,
            network_gb: 0.0,
            storage_rate_per_gb_hour: DEFAULT_STORAGE_RATE_PER_GB_HOUR,
            network_rate_per_gb: DEFAULT_NETWORK_RATE_PER_GB,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub compute: f64,
    pub storage: f64,
    pub network: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostPoint {
    pub hour: u32,
    pub cumulative: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub total: f64,
    pub breakdown: CostBreakdown,
    /// Cumulative cost sampled every 24 hours across the horizon.
    pub over_time: Vec<CostPoint>,
}

pub fn estimate_cost(req: &CostRequest) -> Result<CostEstimate, AnalysisError> {
    if req.hours == 0 {
        return Err(AnalysisError::EmptyHorizon);
    }
    for rate in [req.storage_rate_per_gb_hour, req.network_rate_per_gb] {
        if rate < 0.0 {
            return Err(AnalysisError::NegativeRate(rate));
        }
    }

    let hourly_rate = req.size.hourly_rate();
    let hours = f64::from(req.hours);

    let mut compute = 0.0;
    if req.primary_on {
        compute += hourly_rate * hours;
    }
    if req.secondary_on {
        compute += hourly_rate * hours;
    } else if req.mode == StandbyMode::Cold {
        compute += hourly_rate * hours * COLD_STANDBY_SURCHARGE;
    }

    let storage = req.storage_gb.max(0.0) * req.storage_rate_per_gb_hour * hours;
    let network = req.network_gb.max(0.0) * req.network_rate_per_gb;
    let total = compute + storage + network;

    let mut over_time = Vec::new();
    let mut hour = SERIES_STEP_HOURS;
    while hour < req.hours {
        over_time.push(CostPoint {
            hour,
            cumulative: round_cents(total * f64::from(hour) / hours),
        });
        hour += SERIES_STEP_HOURS;
    }
    over_time.push(CostPoint {
        hour: req.hours,
        cumulative: round_cents(total),
    });

    Ok(CostEstimate {
        total: round_cents(total),
        breakdown: CostBreakdown {
            compute: round_cents(compute),
            storage: round_cents(storage),
            network: round_cents(network),
        },
        over_time,
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
