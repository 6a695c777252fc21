//! Configuration for statecell-replay
//!
//! This crate provides:
//! - Config and data directory paths
//! - Configuration file discovery (TOML)
//! - Replay configuration (ReplayConfig)

pub mod config_file;
pub mod paths;
pub mod replay_config;

pub use config_file::load_config_file;
pub use replay_config::ReplayConfig;
