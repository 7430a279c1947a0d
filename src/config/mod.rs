//! # Configuration Management Module
//!
//! Runtime settings for the merchant board, stored as TOML.
//!
//! ## Configuration Structure
//!
//! - [`SourceConfig`] - where snapshots come from and how often to refresh
//! - [`ClockConfig`] - the single reference clock schedules are read against
//! - [`TrackerConfig`] - arrival / closing alerts for the `watch` service
//! - [`LoggingConfig`] - log level and optional log file
//!
//! Every section is optional; missing sections and fields take the defaults
//! shown below.
//!
//! ```toml
//! [source]
//! kind = "http"
//! url = "https://kloa.gg/merchant"
//! path = "data/merchants.json"
//! timeout_seconds = 15
//! refresh_minutes = 60
//!
//! [clock]
//! utc_offset_minutes = 540
//!
//! [tracker]
//! enabled = true
//! check_seconds = 60
//! ending_soon_minutes = 30
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use merchant_board::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Refreshing every {} minutes", config.source.refresh_minutes);
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Result};
use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::merchant::Span;

/// Korea Standard Time, the clock the upstream schedule is published in.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 9 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Http,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Page or JSON endpoint for `kind = "http"`.
    pub url: String,
    /// Snapshot file for `kind = "file"`.
    pub path: String,
    pub timeout_seconds: u32,
    pub refresh_minutes: u32,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Http,
            url: "https://kloa.gg/merchant".to_string(),
            path: "data/merchants.json".to_string(),
            timeout_seconds: 15,
            refresh_minutes: 60,
            user_agent: concat!("merchant-board/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SourceConfig {
    /// Refresh period, never shorter than one minute.
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.refresh_minutes.max(1)) * 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Offset of the reference clock from UTC, in minutes.
    pub utc_offset_minutes: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl ClockConfig {
    /// Out-of-range offsets fall back to the default.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| {
            warn!(
                "Invalid clock utc_offset_minutes {}, defaulting to {}",
                self.utc_offset_minutes, DEFAULT_UTC_OFFSET_MINUTES
            );
            FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60).unwrap_or_else(|| Utc.fix())
        })
    }

    /// Current wall-clock time on the reference clock.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset()).naive_local()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub enabled: bool,
    pub check_seconds: u32,
    pub ending_soon_minutes: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_seconds: 60,
            ending_soon_minutes: 30,
        }
    }
}

impl TrackerConfig {
    pub fn check_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.check_seconds.max(1)))
    }

    pub fn ending_soon(&self) -> Span {
        Span::from_secs(self.ending_soon_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Unknown level names fall back to `info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_takes_defaults() {
        let config: Config = toml::from_str(
            r#"
            [source]
            kind = "file"
            path = "fixtures/week.json"

            [tracker]
            ending_soon_minutes = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.source.path, "fixtures/week.json");
        assert_eq!(config.source.refresh_minutes, 60);
        assert_eq!(config.clock.utc_offset_minutes, DEFAULT_UTC_OFFSET_MINUTES);
        assert!(config.tracker.enabled);
        assert_eq!(config.tracker.ending_soon(), Span::from_hms(0, 10, 0));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.source.kind, SourceKind::Http);
        assert_eq!(config.tracker.check_seconds, 60);
    }

    #[test]
    fn default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.source.url, SourceConfig::default().url);
        assert_eq!(parsed.clock.utc_offset_minutes, DEFAULT_UTC_OFFSET_MINUTES);
        assert_eq!(parsed.logging.file, None);
    }

    #[test]
    fn bad_offset_falls_back() {
        let clock = ClockConfig {
            utc_offset_minutes: 100_000,
        };
        assert_eq!(clock.offset().local_minus_utc(), DEFAULT_UTC_OFFSET_MINUTES * 60);
    }

    #[test]
    fn intervals_have_floors() {
        let source = SourceConfig {
            refresh_minutes: 0,
            ..SourceConfig::default()
        };
        assert_eq!(source.refresh_interval().as_secs(), 60);
        let tracker = TrackerConfig {
            check_seconds: 0,
            ..TrackerConfig::default()
        };
        assert_eq!(tracker.check_interval().as_secs(), 1);
    }

    #[test]
    fn log_level_parsing() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            file: None,
        };
        assert_eq!(logging.level_filter(), log::LevelFilter::Debug);
        let logging = LoggingConfig {
            level: "chatty".to_string(),
            file: None,
        };
        assert_eq!(logging.level_filter(), log::LevelFilter::Info);
    }
}
