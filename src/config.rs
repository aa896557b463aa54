use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const LOG_LEVEL_VAR: &str = "LOAN_RISK_LOG_LEVEL";
pub const EXPORT_DIR_VAR: &str = "LOAN_RISK_EXPORT_DIR";
pub const DEMO_INTERVAL_VAR: &str = "LOAN_RISK_DEMO_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_level: String,
    pub export_dir: PathBuf,
    pub demo_interval: Duration,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("LOAN_RISK_DEMO_INTERVAL_SECS must be a positive whole number of seconds (got '{0}')")]
    InvalidDemoInterval(String),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            export_dir: PathBuf::from("."),
            demo_interval: Duration::from_secs(5),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment, after loading `.env` if present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup(LOG_LEVEL_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.log_level);

        let export_dir = lookup(EXPORT_DIR_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        let demo_interval = match lookup(DEMO_INTERVAL_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidDemoInterval(raw)),
            },
            None => defaults.demo_interval,
        };

        Ok(Self {
            log_level,
            export_dir,
            demo_interval,
        })
    }
}
