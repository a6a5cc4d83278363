// src/config/mod.rs

pub mod chain_config;

// Re-export main types for convenience
pub use chain_config::{ChainConfig, EnsembleConfig};
