//! Configuration types for the Attendance Engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every field has a
//! default, so a partial configuration file still yields a runnable
//! engine.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Runtime configuration for the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Buffer percentage below which compliance is a warning.
    pub warning_buffer_percent: Decimal,
    /// Cache warming job settings.
    pub cache_warming: CacheWarmingConfig,
    /// Status sync job settings.
    pub status_sync: StatusSyncConfig,
    /// Seconds to wait before retrying a failed job sweep.
    pub retry_cooldown_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            warning_buffer_percent: Decimal::from(5),
            cache_warming: CacheWarmingConfig::default(),
            status_sync: StatusSyncConfig::default(),
            retry_cooldown_secs: 60,
        }
    }
}

/// Settings for the periodic calendar cache warming job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheWarmingConfig {
    /// Seconds between sweeps.
    pub interval_secs: u64,
    /// Days ahead of today to keep warmed.
    pub horizon_days: u32,
}

impl Default for CacheWarmingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 900,
            horizon_days: 14,
        }
    }
}

/// Settings for the periodic child status sync job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusSyncConfig {
    /// Seconds between sweeps.
    pub interval_secs: u64,
}

impl Default for StatusSyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
        }
    }
}
