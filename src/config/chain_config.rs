// src/config/chain_config.rs

use serde::{Deserialize, Serialize};
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,

    /// Number of threads for the ensemble search (default: all cores)
    pub threads: Option<usize>,

    /// Algorithm catalogue
    pub ensemble: EnsembleConfig,
}

/// Bounds of the decomposer parameters tried by the ensemble.
///
/// Window widths and run-length limits are enumerated by doubling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Smallest sliding window width (default: 4)
    pub min_window: u32,

    /// Largest sliding window width (default: 128)
    pub max_window: u32,

    /// Largest run-length cap, starting from 16 (default: 128)
    pub max_run_length: u32,

    /// Hybrid window widths run from 2 to this value (default: 8)
    pub max_hybrid_window: u32,

    /// Largest hybrid run-length cap, starting from 16 (default: 64)
    pub max_hybrid_run_length: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            log_level: "info".to_string(),
            threads: None,
            ensemble: EnsembleConfig::default(),
        }
    }
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        EnsembleConfig {
            min_window: 4,
            max_window: 128,
            max_run_length: 128,
            max_hybrid_window: 8,
            max_hybrid_run_length: 64,
        }
    }
}

impl ChainConfig {
    /// Load configuration with precedence: defaults → config file → env vars
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        // TOML preferred, YAML fallback
        if Path::new("addchain.toml").exists() {
            builder = builder.add_source(File::with_name("addchain.toml"));
        } else if Path::new("addchain.yaml").exists() {
            builder = builder.add_source(File::with_name("addchain.yaml"));
        }

        Self::finish(builder)
    }

    /// Load configuration with custom file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        Self::finish(builder)
    }

    /// Worker threads for the ensemble search.
    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = EnsembleConfig::default();
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("ensemble.min_window", i64::from(defaults.min_window))?
            .set_default("ensemble.max_window", i64::from(defaults.max_window))?
            .set_default("ensemble.max_run_length", i64::from(defaults.max_run_length))?
            .set_default("ensemble.max_hybrid_window", i64::from(defaults.max_hybrid_window))?
            .set_default("ensemble.max_hybrid_run_length", i64::from(defaults.max_hybrid_run_length))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        // Override with environment variables, e.g. ADDCHAIN_ENSEMBLE__MAX_WINDOW=64
        let config = builder
            .add_source(
                Environment::with_prefix("ADDCHAIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }
}
