//! Configuration resolution.
//!
//! Priority, highest first:
//! 1. explicit overrides (CLI flags)
//! 2. environment variables (`API_BASE_URL`, `STORYDOC_TIMEOUT_SECS`, `STORYDOC_LOG`)
//! 3. `~/.config/storydoc/config.toml`
//!
//! A missing base URL is a startup error, not something discovered at the
//! first network call.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use storydoc_core::{Result, ServiceEndpoints, StorydocError};

use crate::paths::StorydocPaths;

pub const BASE_URL_ENV: &str = "API_BASE_URL";
pub const TIMEOUT_ENV: &str = "STORYDOC_TIMEOUT_SECS";
pub const LOG_ENV: &str = "STORYDOC_LOG";

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoints: ServiceEndpoints,
    /// `None` keeps the transport default (no request deadline).
    pub timeout: Option<Duration>,
    pub log_level: String,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    service: ServiceSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceSection {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingSection {
    level: Option<String>,
}

/// Loads [`AppConfig`] from its sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env: HashMap<String, String>,
}

impl ConfigLoader {
    /// Reads the process environment and the default config file location.
    pub fn from_process() -> Self {
        let env = [BASE_URL_ENV, TIMEOUT_ENV, LOG_ENV]
            .into_iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect();
        Self {
            config_path: StorydocPaths::config_file().ok(),
            env,
        }
    }

    /// Builds a loader from explicit sources.
    pub fn with_sources(config_path: Option<PathBuf>, env: HashMap<String, String>) -> Self {
        Self { config_path, env }
    }

    pub fn load(&self, overrides: &ConfigOverrides) -> Result<AppConfig> {
        let file = self.read_file()?;

        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| self.env_value(BASE_URL_ENV))
            .or(file.service.base_url)
            .ok_or_else(|| {
                StorydocError::config(format!(
                    "service base URL is not configured; set {BASE_URL_ENV}, pass --base-url, \
                     or add [service] base_url to {}",
                    self.config_path_display()
                ))
            })?;
        let endpoints = ServiceEndpoints::from_base_url(&base_url)?;

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => Some(secs),
            None => match self.env_value(TIMEOUT_ENV) {
                Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                    StorydocError::config(format!("{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"))
                })?),
                None => file.service.timeout_secs,
            },
        };
        // Zero means "no deadline", same as leaving it unset.
        let timeout = timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let log_level = overrides
            .log_level
            .clone()
            .or_else(|| self.env_value(LOG_ENV))
            .or(file.logging.level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        tracing::debug!(base_url = endpoints.base_url(), ?timeout, "configuration resolved");

        Ok(AppConfig {
            endpoints,
            timeout,
            log_level,
        })
    }

    fn env_value(&self, key: &str) -> Option<String> {
        self.env
            .get(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn read_file(&self) -> Result<ConfigFile> {
        let Some(path) = self.config_path.as_deref() else {
            return Ok(ConfigFile::default());
        };
        if !path.exists() {
            return Ok(ConfigFile::default());
        }
        let content = std::fs::read_to_string(path)?;
        let parsed: ConfigFile = toml::from_str(&content).map_err(|err| {
            StorydocError::config(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                err
            ))
        })?;
        Ok(parsed)
    }

    fn config_path_display(&self) -> String {
        self.config_path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "config.toml".to_string())
    }
}
