//! Application configuration
//!
//! Loaded from a TOML file (`~/.config/campus-booking/config.toml` by
//! default, overridable via the `BOOKING_CONFIG` env var). Every section
//! has working defaults so the service starts with no file at all.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::policy::BookingPolicy;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub policy: BookingPolicy,
    #[serde(default)]
    pub attendance: AttendanceConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub campus: CampusConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds allowed for in-flight requests during graceful shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// SeaORM connection URL; SQLite by default, PostgreSQL works unchanged
    pub url: String,
    /// Upper bound on the claim transaction, in milliseconds
    pub claim_timeout_ms: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./campus_booking.db?mode=rwc".to_string(),
            claim_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceConfig {
    /// Check-in accepted within this many minutes around booking start
    pub checkin_window_minutes: i64,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            checkin_window_minutes: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// How often the no-show/completion sweep runs, in seconds
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampusConfig {
    /// Campus timezone as a fixed offset east of UTC
    pub utc_offset_hours: i32,
}

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 6,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&raw).map_err(ConfigError::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Default config location: `~/.config/campus-booking/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("campus-booking")
        .join("config.toml")
}

// ── Tests ──────────────────────────────────────────────────────
