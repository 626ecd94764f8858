//! # Desk Configuration
//!
//! Shop identity, print settings, locale and database location.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STITCH_DB_PATH=/srv/stitch/stitch.db                               │
//! │     STITCH_PRINT_COMMAND="lp -d counter"                               │
//! │     STITCH_DB_READ_ONLY=1                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <PATH>, else $STITCH_CONFIG, else                         │
//! │     ~/.config/stitch-desk/stitch-desk.toml (Linux)                     │
//! │     ~/Library/Application Support/com.stitch.desk/stitch-desk.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     500ms settle delay, IST (+05:30), platform data directory          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # stitch-desk.toml
//! [shop]
//! name = "Kulkarni Tailors"
//! tagline = "Bespoke Tailoring & Alterations"
//! address_lines = ["12 Market Road", "Pune, Maharashtra 411001"]
//! phone = "+91 98765 43210"
//! terms = ["Goods once sold will not be taken back."]
//!
//! [print]
//! settle_delay_ms = 500
//! output_dir = "/var/spool/stitch-desk"
//! command = ["lp", "-d", "counter"]
//!
//! [locale]
//! utc_offset_minutes = 330
//!
//! [database]
//! path = "/srv/stitch/stitch.db"
//! read_only = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use stitch_core::document::ShopIdentity;
use stitch_core::format::{DateFormatter, IST_OFFSET_MINUTES};
use stitch_core::PRINT_SETTLE_DELAY_MS;

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "stitch-desk.toml";

// =============================================================================
// Config Error
// =============================================================================

/// Errors loading, validating or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No config path available")]
    NoPath,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[print]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintSettings {
    /// Wait between painting a document and printing it.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Where painted documents are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Print command argv; the document path is appended. Unset means the
    /// document is only spooled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

fn default_settle_delay() -> u64 {
    PRINT_SETTLE_DELAY_MS
}

fn default_output_dir() -> PathBuf {
    data_dir().join("spool")
}

impl Default for PrintSettings {
    fn default() -> Self {
        PrintSettings {
            settle_delay_ms: default_settle_delay(),
            output_dir: default_output_dir(),
            command: None,
        }
    }
}

/// `[locale]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleSettings {
    /// Shop's offset from UTC, used for every printed date.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

fn default_utc_offset() -> i32 {
    IST_OFFSET_MINUTES
}

impl Default for LocaleSettings {
    fn default() -> Self {
        LocaleSettings {
            utc_offset_minutes: default_utc_offset(),
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Open without write access. Document printing still works; `pay` and
    /// `status` fail with `PERMISSION_DENIED`.
    #[serde(default)]
    pub read_only: bool,
}

fn default_database_path() -> PathBuf {
    data_dir().join("stitch.db")
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            read_only: false,
        }
    }
}

// =============================================================================
// Desk Config
// =============================================================================

/// Complete desk configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub shop: ShopIdentity,

    #[serde(default)]
    pub print: PrintSettings,

    #[serde(default)]
    pub locale: LocaleSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl DeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$STITCH_CONFIG`, platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(Self::env_config_path)
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(path = %path.display(), "Loading desk config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(path = %path.display(), "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(path = %path.display(), "Desk config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.shop.name.trim().is_empty() {
            return Err(ConfigError::Invalid("shop.name must not be empty".into()));
        }

        if DateFormatter::with_offset_minutes(self.locale.utc_offset_minutes).is_none() {
            return Err(ConfigError::Invalid(format!(
                "locale.utc_offset_minutes out of range: {}",
                self.locale.utc_offset_minutes
            )));
        }

        if let Some(command) = &self.print.command {
            if command.first().map_or(true, |program| program.trim().is_empty()) {
                return Err(ConfigError::Invalid(
                    "print.command must name a program".into(),
                ));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("STITCH_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(value) = std::env::var("STITCH_DB_READ_ONLY") {
            self.database.read_only = matches!(value.as_str(), "1" | "true" | "yes");
        }

        if let Ok(name) = std::env::var("STITCH_SHOP_NAME") {
            self.shop.name = name;
        }

        if let Ok(dir) = std::env::var("STITCH_SPOOL_DIR") {
            self.print.output_dir = PathBuf::from(dir);
        }

        if let Ok(command) = std::env::var("STITCH_PRINT_COMMAND") {
            debug!(command = %command, "Overriding print command from environment");
            self.print.command = Some(command.split_whitespace().map(String::from).collect());
        }

        if let Ok(delay) = std::env::var("STITCH_PRINT_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => self.print.settle_delay_ms = ms,
                Err(_) => warn!(value = %delay, "Ignoring invalid STITCH_PRINT_DELAY_MS"),
            }
        }

        if let Ok(offset) = std::env::var("STITCH_UTC_OFFSET_MINUTES") {
            match offset.parse::<i32>() {
                Ok(minutes) => self.locale.utc_offset_minutes = minutes,
                Err(_) => warn!(value = %offset, "Ignoring invalid STITCH_UTC_OFFSET_MINUTES"),
            }
        }
    }

    fn env_config_path() -> Option<PathBuf> {
        std::env::var_os("STITCH_CONFIG").map(PathBuf::from)
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stitch", "desk")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Date formatter for the shop's offset.
    pub fn date_formatter(&self) -> DateFormatter {
        DateFormatter::with_offset_minutes(self.locale.utc_offset_minutes).unwrap_or_default()
    }

    /// Delay between paint and print.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.print.settle_delay_ms)
    }

    /// Database file, replaced by `--db` when given.
    pub fn database_path<'a>(&'a self, flag: Option<&'a Path>) -> &'a Path {
        flag.unwrap_or(&self.database.path)
    }
}

/// Platform data directory, or the working directory when none exists.
fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "stitch", "desk")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeskConfig::default();
        assert_eq!(config.print.settle_delay_ms, 500);
        assert_eq!(config.settle_delay(), Duration::from_millis(500));
        assert_eq!(config.locale.utc_offset_minutes, 330);
        assert_eq!(config.date_formatter(), DateFormatter::ist());
        assert!(config.print.command.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = DeskConfig::default();
        config.shop.name = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = DeskConfig::default();
        config.locale.utc_offset_minutes = 24 * 60;
        assert!(config.validate().is_err());

        let mut config = DeskConfig::default();
        config.print.command = Some(Vec::new());
        assert!(config.validate().is_err());

        config.print.command = Some(vec!["lp".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: DeskConfig = toml::from_str(
            r#"
            [shop]
            name = "Kulkarni Tailors"
            address_lines = ["12 Market Road"]

            [print]
            command = ["lp", "-d", "counter"]

            [database]
            read_only = true
            "#,
        )
        .unwrap();

        assert_eq!(config.shop.name, "Kulkarni Tailors");
        assert!(config.shop.terms.is_empty());
        assert_eq!(config.print.settle_delay_ms, 500);
        assert_eq!(config.print.command.as_ref().map(Vec::len), Some(3));
        assert_eq!(config.locale.utc_offset_minutes, 330);
        assert!(config.database.read_only);
        assert!(config.database.path.ends_with("stitch.db"));
    }

    #[test]
    fn test_toml_serialization() {
        let config = DeskConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[shop]"));
        assert!(toml_str.contains("[print]"));
        assert!(toml_str.contains("[locale]"));

        let parsed: DeskConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("stitch-desk-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE_NAME);

        let mut config = DeskConfig::default();
        config.shop.name = "Menon Bespoke".to_string();
        config.locale.utc_offset_minutes = 345;
        config.save(Some(path.clone())).unwrap();

        let loaded = DeskConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.locale.utc_offset_minutes, 345);
        assert!(!loaded.shop.name.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_database_path_flag_wins() {
        let config = DeskConfig::default();
        let flag = PathBuf::from("/tmp/other.db");
        assert_eq!(config.database_path(Some(flag.as_path())), flag.as_path());
        assert_eq!(config.database_path(None), config.database.path.as_path());
    }
}
