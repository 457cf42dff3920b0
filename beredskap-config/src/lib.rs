//! # Beredskap Configuration System
//!
//! Hierarchical configuration for the standby simulator.
//!
//! ## Features
//! - **Unified Configuration**: Single source of truth across all components
//! - **Validation**: Runtime validation of critical parameters
//! - **Environment Awareness**: `BEREDSKAP_ENV` selects an override file

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod cost;
mod error;
mod regions;
mod simulator;

pub use cost::CostConfig;
pub use error::ConfigError;
pub use regions::RegionsConfig;
pub use simulator::SimulatorConfig;

/// Top-level configuration container for all Beredskap components.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct BeredskapConfig {
    /// Simulation parameters (seed, timeline, grace window).
    #[validate(nested)]
    pub simulator: SimulatorConfig,

    /// Cost model rates.
    #[validate(nested)]
    pub cost: CostConfig,

    /// Multi-region scenario layout.
    #[validate(nested)]
    pub regions: RegionsConfig,
}

impl BeredskapConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/beredskap.yaml` - base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - environment-specific overrides.
    /// 4. `BEREDSKAP_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(BeredskapConfig::default()));

        if Path::new("config/beredskap.yaml").exists() {
            figment = figment.merge(Yaml::file("config/beredskap.yaml"));
        }

        if let Ok(env) = std::env::var("BEREDSKAP_ENV") {
            let env_file = format!("config/{}.yaml", env);
            if Path::new(&env_file).exists() {
                figment = figment.merge(Yaml::file(env_file));
            }
        }

        figment
            .merge(Env::prefixed("BEREDSKAP_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path for testing/validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        Figment::from(Serialized::defaults(BeredskapConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("BEREDSKAP_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = BeredskapConfig::default();
        config.validate().expect("default config should validate");
    }

    #[test]
    fn invalid_timeline_capacity_is_rejected() {
        let mut config = BeredskapConfig::default();
        config.simulator.timeline_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_overrides_defaults() {
        let path = std::env::temp_dir().join("beredskap-config-test.yaml");
        std::fs::write(&path, "simulator:\n  seed: 7\n  timeline_capacity: 16\n").unwrap();

        let config = BeredskapConfig::load_from_path(&path).unwrap();
        assert_eq!(config.simulator.seed, 7);
        assert_eq!(config.simulator.timeline_capacity, 16);
        // Untouched sections keep their defaults.
        assert_eq!(config.regions.names.len(), 2);
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            BeredskapConfig::load_from_path("/nonexistent/beredskap.yaml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
