//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "processorUrl": "http://127.0.0.1:3000",
//!   "processorDelayMs": 1000,
//!   "failureThreshold": "5000",
//!   "startingBalance": "1000",
//!   "serverBind": "127.0.0.1:3000"
//! }
//! ```
//! Every key is optional. Keys this crate does not know are preserved on save.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_FAILURE_THRESHOLD, DEFAULT_STARTING_BALANCE};

/// Default bind address for `ft serve`
pub const DEFAULT_SERVER_BIND: &str = "127.0.0.1:3000";

const DEFAULT_DELAY_MS: u64 = 1000;

/// Environment variable overriding the processor URL
pub const PROCESSOR_URL_ENV: &str = "FINTRANS_PROCESSOR_URL";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    processor_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    processor_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_threshold: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    starting_balance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    server_bind: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote processor base URL from settings.json
    pub processor_url: Option<String>,
    /// `FINTRANS_PROCESSOR_URL` at load time. Never written back.
    pub processor_url_override: Option<String>,
    pub processor_delay: Duration,
    pub failure_threshold: Decimal,
    pub starting_balance: Decimal,
    pub server_bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            processor_url: None,
            processor_url_override: None,
            processor_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            starting_balance: DEFAULT_STARTING_BALANCE,
            server_bind: DEFAULT_SERVER_BIND.to_string(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or malformed settings file yields defaults. The processor URL
    /// can be overridden with `FINTRANS_PROCESSOR_URL` (empty string forces
    /// the in-process processor).
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_with_override(data_dir, std::env::var(PROCESSOR_URL_ENV).ok())
    }

    /// Load config with an explicit processor URL override
    pub fn load_with_override(data_dir: &Path, url_override: Option<String>) -> Result<Self> {
        let raw = Self::read_raw(data_dir)?;
        let defaults = Self::default();

        Ok(Self {
            processor_url: raw.processor_url.filter(|url| !url.trim().is_empty()),
            processor_url_override: url_override,
            processor_delay: raw
                .processor_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.processor_delay),
            failure_threshold: raw.failure_threshold.unwrap_or(defaults.failure_threshold),
            starting_balance: raw.starting_balance.unwrap_or(defaults.starting_balance),
            server_bind: raw.server_bind.unwrap_or(defaults.server_bind),
        })
    }

    /// The processor URL to use: the override if set, else settings.json.
    /// `None` means decide in-process.
    pub fn effective_processor_url(&self) -> Option<&str> {
        let url = match &self.processor_url_override {
            Some(url) => Some(url.as_str()),
            None => self.processor_url.as_deref(),
        };
        url.filter(|url| !url.trim().is_empty())
    }

    /// Save config to the data directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = Self::read_raw(data_dir)?;

        settings.processor_url = self.processor_url.clone();
        settings.processor_delay_ms = Some(self.processor_delay.as_millis() as u64);
        settings.failure_threshold = Some(self.failure_threshold);
        settings.starting_balance = Some(self.starting_balance);
        settings.server_bind = Some(self.server_bind.clone());

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }

    fn read_raw(data_dir: &Path) -> Result<SettingsFile> {
        let settings_path = data_dir.join("settings.json");
        if !settings_path.exists() {
            return Ok(SettingsFile::default());
        }
        let content = std::fs::read_to_string(&settings_path)?;
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.processor_delay, Duration::from_millis(1000));
        assert_eq!(config.failure_threshold, Decimal::from(5000));
        assert_eq!(config.starting_balance, Decimal::from(1000));
        assert_eq!(config.server_bind, DEFAULT_SERVER_BIND);
    }

    #[test]
    fn test_malformed_settings_fall_back() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.failure_threshold, Decimal::from(5000));
    }

    #[test]
    fn test_reads_values() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"processorDelayMs": 50, "failureThreshold": "250", "startingBalance": 10000}"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.processor_delay, Duration::from_millis(50));
        assert_eq!(config.failure_threshold, Decimal::from(250));
        assert_eq!(config.starting_balance, Decimal::from(10000));
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"theme": "dark", "serverBind": "0.0.0.0:8080"}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.processor_delay = Duration::from_millis(10);
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["serverBind"], "0.0.0.0:8080");
        assert_eq!(json["processorDelayMs"], 10);
    }

    #[test]
    fn test_url_override_is_not_saved() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"processorUrl": "http://127.0.0.1:3000"}"#,
        )
        .unwrap();

        let mut config =
            Config::load_with_override(dir.path(), Some("http://10.0.0.9:9".to_string())).unwrap();
        assert_eq!(config.effective_processor_url(), Some("http://10.0.0.9:9"));

        config.processor_delay = Duration::from_millis(5);
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["processorUrl"], "http://127.0.0.1:3000");
        assert_eq!(json["processorDelayMs"], 5);

        let reloaded = Config::load_with_override(dir.path(), None).unwrap();
        assert_eq!(reloaded.effective_processor_url(), Some("http://127.0.0.1:3000"));
        assert_eq!(reloaded.processor_delay, Duration::from_millis(5));
    }

    #[test]
    fn test_empty_override_forces_in_process() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"processorUrl": "http://127.0.0.1:3000"}"#,
        )
        .unwrap();

        let config = Config::load_with_override(dir.path(), Some(String::new())).unwrap();
        assert_eq!(config.effective_processor_url(), None);
        assert_eq!(config.processor_url.as_deref(), Some("http://127.0.0.1:3000"));
    }
}
