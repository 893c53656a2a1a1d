//! Configuration management for Switchboard
//!
//! Parses TOML configuration files and provides typed access to settings.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    30
}

/// Registry persistence configuration
///
/// Endpoint and preset stores are flat JSON files under `data_dir`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Health probe configuration
///
/// `timeout_seconds` bounds each individual probe; `interval_seconds` is the
/// period of the background sweep scheduler.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_probe_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_probe_interval(),
            timeout_seconds: default_probe_timeout(),
        }
    }
}

fn default_probe_interval() -> u64 {
    30
}

fn default_probe_timeout() -> u64 {
    5
}

impl ProbeConfig {
    /// Per-probe timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Sweep interval as a Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// MQTT relay bridge configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    #[serde(default = "default_relay_host")]
    pub host: String,
    #[serde(default = "default_relay_port")]
    pub port: u16,
    /// Topic chat envelopes are published to
    #[serde(default = "default_publish_topic")]
    pub publish_topic: String,
    /// Topic assistant replies arrive on
    #[serde(default = "default_subscribe_topic")]
    pub subscribe_topic: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_relay_host(),
            port: default_relay_port(),
            publish_topic: default_publish_topic(),
            subscribe_topic: default_subscribe_topic(),
        }
    }
}

fn default_relay_host() -> String {
    "127.0.0.1".to_string()
}

fn default_relay_port() -> u16 {
    1883
}

fn default_publish_topic() -> String {
    "switchboard/outbound".to_string()
}

fn default_subscribe_topic() -> String {
    "switchboard/inbound".to_string()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            crate::error::AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let config: Self = toml::from_str(&content).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 3: Validate parsed config (provides contextual reason)
        config
            .validate()
            .map_err(|e| crate::error::AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()`, but can also be called
    /// explicitly when constructing Config via other means (e.g., in tests).
    pub fn validate(&self) -> crate::error::AppResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "Configuration error: server.host must not be empty".to_string(),
            ));
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "Configuration error: request_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_seconds > 300 {
            return Err(crate::error::AppError::Config(format!(
                "Configuration error: request_timeout_seconds cannot exceed 300 seconds (5 minutes), got {}",
                self.server.request_timeout_seconds
            )));
        }

        if self.registry.data_dir.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "Configuration error: registry.data_dir must not be empty".to_string(),
            ));
        }

        // Probe timeout must be bounded: a zero timeout marks every endpoint
        // offline, an unbounded one lets a hung endpoint stall the sweep.
        if self.probe.timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "Configuration error: probe.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.probe.timeout_seconds > 60 {
            return Err(crate::error::AppError::Config(format!(
                "Configuration error: probe.timeout_seconds cannot exceed 60 seconds, got {}",
                self.probe.timeout_seconds
            )));
        }

        if self.probe.interval_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "Configuration error: probe.interval_seconds must be greater than 0".to_string(),
            ));
        }
        if self.probe.interval_seconds > 3600 {
            return Err(crate::error::AppError::Config(format!(
                "Configuration error: probe.interval_seconds cannot exceed 3600 seconds (1 hour), got {}",
                self.probe.interval_seconds
            )));
        }

        if self.relay.publish_topic.trim().is_empty()
            || self.relay.subscribe_topic.trim().is_empty()
        {
            return Err(crate::error::AppError::Config(
                "Configuration error: relay topics must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = crate::error::AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(toml_str).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            }
        })?;

        // Validate config before returning
        config.validate()?;
        Ok(config)
    }
}
