//! Configuration loading and management for the Attendance Engine.
//!
//! This module provides functionality to load the engine's runtime
//! configuration from a YAML file: the compliance warning threshold,
//! background job cadences, and the retry cooldown.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::EngineConfig;
//!
//! let config = EngineConfig::load("./config/engine.yaml").unwrap();
//! println!("Cache warming every {}s", config.cache_warming.interval_secs);
//! ```

mod loader;
mod types;

pub use types::{CacheWarmingConfig, EngineConfig, StatusSyncConfig};
