//! Cost model configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct CostConfig {
    /// Storage accrual in $/GB/hour.
    #[validate(range(min = 0.0, message = "storage rate must be non-negative"))]
    pub storage_rate_per_gb_hour: f64,

    /// Flat transfer charge in $/GB.
    #[validate(range(min = 0.0, message = "network rate must be non-negative"))]
    pub network_rate_per_gb: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            storage_rate_per_gb_hour: 0.0001,
            network_rate_per_gb: 0.09,
        }
    }
}
