//! Configuration plumbing shared by `homelinkd` and `homelink`.
//!
//! Each binary owns its own `Config` shape. This crate supplies the common
//! layering: an optional TOML file, then environment overrides, then the
//! binary's own validation.

use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;

/// Environment variable naming the log filter for both binaries.
pub const LOG_ENV: &str = "HOMELINK_LOG";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl ConfigError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Read a TOML file into `T`, falling back to `T::default()` when the file
/// does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn from_file<T>(path: impl AsRef<Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(ConfigError::Io(err)),
    }
}

/// Value of an environment variable, if set and valid unicode.
#[must_use]
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Value of an environment variable parsed as `T`. Unparsable values are
/// ignored.
#[must_use]
pub fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|val| val.parse().ok())
}

/// Override `filter` from `RUST_LOG`, else from [`LOG_ENV`].
pub fn apply_log_overrides(filter: &mut String) {
    apply_log_overrides_from(filter, env_string);
}

fn apply_log_overrides_from(filter: &mut String, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("RUST_LOG").or_else(|| lookup(LOG_ENV)) {
        *filter = val;
    }
}
