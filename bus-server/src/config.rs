//! Environment-driven configuration.

use std::time::Duration;

/// A configuration value that is missing or unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds
    pub port: u16,
    /// Cadence of the periodic dataset sync
    pub sync_interval: Duration,
    /// DataMall account key sent with every upstream request
    pub account_key: String,
    /// Override for the DataMall host, mainly for tests and proxies
    pub base_url: Option<String>,
    /// Directory served under `/static`
    pub static_dir: String,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// `PORT` and `SYNC_INTERVAL_MINUTES` fall back to 8080 and 1440
    /// (once a day). `DATAMALL_ACCOUNT_KEY` has no fallback; the
    /// upstream rejects unkeyed requests.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or_default(lookup("PORT"), "PORT", 8080u16)?;

        let minutes =
            parse_or_default(lookup("SYNC_INTERVAL_MINUTES"), "SYNC_INTERVAL_MINUTES", 1440u64)?;
        if minutes == 0 {
            return Err(ConfigError::Invalid {
                name: "SYNC_INTERVAL_MINUTES",
                value: "0".to_string(),
            });
        }

        let account_key = match lookup("DATAMALL_ACCOUNT_KEY") {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(ConfigError::Missing("DATAMALL_ACCOUNT_KEY")),
        };

        let base_url = lookup("DATAMALL_BASE_URL").filter(|url| !url.trim().is_empty());
        let static_dir = lookup("STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| "static".to_string());

        Ok(AppConfig {
            port,
            sync_interval: Duration::from_secs(minutes * 60),
            account_key,
            base_url,
            static_dir,
        })
    }
}

/// Parse an optional variable, treating unset and blank as the default.
fn parse_or_default<T: std::str::FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
