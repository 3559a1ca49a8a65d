//! Configuration management
//!
//! Settings live in `<data_dir>/settings.json`:
//! ```json
//! {
//!   "app": { "pageSize": 8, "eventLogging": true, ... }
//! }
//! ```
//! Keys this crate does not manage are kept untouched on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::services::PRODUCTS_PER_PAGE;

const SETTINGS_FILE: &str = "settings.json";

/// Env var overriding the dashboard page size
pub const PAGE_SIZE_ENV: &str = "VITRINE_PAGE_SIZE";

/// Env var overriding event logging
pub const EVENT_LOGGING_ENV: &str = "VITRINE_EVENT_LOGGING";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_logging: Option<bool>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Vitrine configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Products per dashboard page, at least 1
    pub page_size: usize,
    /// Whether front ends record events in logs.duckdb
    pub event_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: PRODUCTS_PER_PAGE,
            event_logging: true,
        }
    }
}

impl Config {
    /// Load config from the data directory, applying env overrides.
    ///
    /// A missing or malformed settings file yields the defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        Ok(Self::from_settings(&raw, |key| std::env::var(key).ok()))
    }

    fn from_settings(raw: &SettingsFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let page_size = match env(PAGE_SIZE_ENV).map(|v| v.trim().parse::<usize>()) {
            Some(Ok(size)) if size > 0 => size,
            Some(_) => {
                tracing::warn!("Ignoring invalid {}", PAGE_SIZE_ENV);
                raw.app.page_size.unwrap_or(defaults.page_size)
            }
            None => raw.app.page_size.unwrap_or(defaults.page_size),
        }
        .max(1);

        let event_logging = match env(EVENT_LOGGING_ENV).as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.event_logging.unwrap_or(defaults.event_logging),
        };

        Self {
            page_size,
            event_logging,
        }
    }

    /// Save config to the data directory, preserving settings this crate
    /// doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;
        settings.app.page_size = Some(self.page_size);
        settings.app.event_logging = Some(self.event_logging);

        let content = serde_json::to_string_pretty(&settings)?;
        let settings_path = data_dir.join(SETTINGS_FILE);
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed settings.json: {}", e);
        SettingsFile::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let raw = read_settings(dir.path()).unwrap();
        let config = Config::from_settings(&raw, no_env);
        assert_eq!(config.page_size, 8);
        assert!(config.event_logging);
    }

    #[test]
    fn test_reads_app_section() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app":{"pageSize":4,"eventLogging":false}}"#,
        )
        .unwrap();

        let config = Config::from_settings(&read_settings(dir.path()).unwrap(), no_env);
        assert_eq!(config.page_size, 4);
        assert!(!config.event_logging);
    }

    #[test]
    fn test_env_overrides() {
        let raw = SettingsFile::default();
        let env = |key: &str| match key {
            PAGE_SIZE_ENV => Some("12".to_string()),
            EVENT_LOGGING_ENV => Some("no".to_string()),
            _ => None,
        };
        let config = Config::from_settings(&raw, env);
        assert_eq!(config.page_size, 12);
        assert!(!config.event_logging);

        let bad = |key: &str| (key == PAGE_SIZE_ENV).then(|| "zero".to_string());
        assert_eq!(Config::from_settings(&raw, bad).page_size, 8);
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app":{"theme":"dark"},"plugins":{"x":1}}"#,
        )
        .unwrap();

        let config = Config {
            page_size: 5,
            event_logging: false,
        };
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("settings.json")).unwrap())
                .unwrap();
        assert_eq!(saved["app"]["pageSize"], 5);
        assert_eq!(saved["app"]["eventLogging"], false);
        assert_eq!(saved["app"]["theme"], "dark");
        assert_eq!(saved["plugins"]["x"], 1);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{oops").unwrap();
        let config = Config::from_settings(&read_settings(dir.path()).unwrap(), no_env);
        assert_eq!(config.page_size, 8);
    }
}
