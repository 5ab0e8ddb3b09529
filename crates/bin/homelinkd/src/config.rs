//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `homelinkd.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use homelink_adapter_tcp::DEFAULT_PORT;
use homelink_config::{ConfigError, apply_log_overrides, env_parse, env_string};
use homelink_domain::debounce::DEFAULT_COOLDOWN;
use homelink_domain::dispatch::ActuatorLayout;
use homelink_domain::notification::DOORBELL_MESSAGE;

/// Highest duty cycle a soft-PWM channel accepts.
const MAX_DUTY: u8 = 100;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listener settings.
    pub server: ServerConfig,
    /// Actuator wiring.
    pub gpio: GpioConfig,
    /// Doorbell trigger settings.
    pub doorbell: DoorbellConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// TCP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Accept a new client after the previous one disconnects.
    pub reaccept: bool,
}

/// Pin and channel assignment for the light and the door servo.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GpioConfig {
    pub light_pin: u8,
    pub door_channel: u8,
    pub door_open_duty: u8,
    pub door_close_duty: u8,
    pub door_neutral_duty: u8,
    /// How long the door servo is driven before returning to neutral.
    pub door_pulse_ms: u64,
}

/// Doorbell debounce and notification text.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DoorbellConfig {
    pub cooldown_ms: u64,
    /// Line sent to the client when the doorbell rings.
    pub message: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `homelinkd.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config: Self = homelink_config::from_file("homelinkd.toml")?;
        config.apply_env_overrides();
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
        if let Some(ms) = env_parse("HOMELINK_COOLDOWN_MS") {
            self.doorbell.cooldown_ms = ms;
        }
        apply_log_overrides(&mut self.logging.filter);
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::validation("port must be non-zero"));
        }
        if self.doorbell.message.is_empty() {
            return Err(ConfigError::validation("doorbell message must not be empty"));
        }
        if self.doorbell.message.contains(['\n', '\r']) {
            return Err(ConfigError::validation("doorbell message must be a single line"));
        }
        for (name, duty) in [
            ("door_open_duty", self.gpio.door_open_duty),
            ("door_close_duty", self.gpio.door_close_duty),
            ("door_neutral_duty", self.gpio.door_neutral_duty),
        ] {
            if duty > MAX_DUTY {
                return Err(ConfigError::validation(format!(
                    "{name} must be at most {MAX_DUTY}, got {duty}"
                )));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Actuator wiring for the dispatch table.
    #[must_use]
    pub fn layout(&self) -> ActuatorLayout {
        ActuatorLayout {
            light_pin: self.gpio.light_pin,
            door_channel: self.gpio.door_channel,
            door_open_duty: self.gpio.door_open_duty,
            door_close_duty: self.gpio.door_close_duty,
            door_neutral_duty: self.gpio.door_neutral_duty,
            door_pulse: Duration::from_millis(self.gpio.door_pulse_ms),
        }
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.doorbell.cooldown_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            reaccept: false,
        }
    }
}

impl Default for GpioConfig {
    fn default() -> Self {
        let layout = ActuatorLayout::default();
        Self {
            light_pin: layout.light_pin,
            door_channel: layout.door_channel,
            door_open_duty: layout.door_open_duty,
            door_close_duty: layout.door_close_duty,
            door_neutral_duty: layout.door_neutral_duty,
            door_pulse_ms: u64::try_from(layout.door_pulse.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl Default for DoorbellConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: u64::try_from(DEFAULT_COOLDOWN.as_millis()).unwrap_or(u64::MAX),
            message: DOORBELL_MESSAGE.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homelinkd=info,homelink=info".to_string(),
        }
    }
}
