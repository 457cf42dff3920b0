//! Multi-region scenario configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct RegionsConfig {
    /// Region names for the multi-region disaster scenario.
    #[validate(length(min = 1, message = "at least one region is required"))]
    pub names: Vec<String>,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            names: vec!["US East".to_string(), "Europe".to_string()],
        }
    }
}
