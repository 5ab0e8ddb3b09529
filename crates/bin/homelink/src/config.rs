//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `homelink.toml` in the working directory. The file is optional.
//! Environment variables override the file, and a host given on the command
//! line overrides both.

use serde::Deserialize;

use homelink_adapter_tcp::DEFAULT_PORT;
use homelink_config::{ConfigError, apply_log_overrides, env_parse, env_string};
use homelink_domain::translator::MatchPolicy;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Controller address.
    pub server: ServerConfig,
    /// Utterance translation.
    pub voice: VoiceConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Where the controller listens.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name or IP address of the controller.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// `all` sends every command an utterance names, `first` only the first.
    pub policy: MatchPolicy,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load `homelink.toml` (if present), apply environment overrides, then
    /// the optional host from the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load(host: Option<String>) -> Result<Self, ConfigError> {
        let mut config: Self = homelink_config::from_file("homelink.toml")?;
        config.apply_env_overrides();
        if let Some(host) = host {
            config.server.host = host;
        }
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(host) = env_string("HOMELINK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("HOMELINK_PORT") {
            self.server.port = port;
        }
        apply_log_overrides(&mut self.logging.filter);
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::validation("host must not be empty"));
        }
        if self.server.port == 0 {
            return Err(ConfigError::validation("port must be non-zero"));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homelink=info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.voice.policy, MatchPolicy::AllMatches);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = 'raspberrypi.local'
            port = 6001

            [voice]
            policy = 'first'

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "raspberrypi.local");
        assert_eq!(config.server.port, 6001);
        assert_eq!(config.voice.policy, MatchPolicy::FirstMatch);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let config: Config = toml::from_str("[server]\nhost = '10.0.0.2'").unwrap();
        assert_eq!(config.server.host, "10.0.0.2");
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.voice.policy, MatchPolicy::AllMatches);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config: Config = homelink_config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 6000);
    }

    #[test]
    fn should_reject_unknown_policy() {
        let result: Result<Config, _> = toml::from_str("[voice]\npolicy = 'some'");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_empty_host_and_zero_port() {
        let mut config = Config::default();
        config.server.host = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }
}
