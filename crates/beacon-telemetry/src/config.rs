//! Telemetry configuration from environment variables.

use std::env;

use crate::TelemetryError;

/// Configuration for beacon logging.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to logs
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "random-beacon".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BEACON_SERVICE_NAME`: Service name (default: random-beacon)
    /// - `BEACON_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `BEACON_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `BEACON_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("BEACON_SERVICE_NAME")
                .unwrap_or_else(|_| "random-beacon".to_string()),

            log_level: env::var("BEACON_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("BEACON_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v).unwrap_or(true))
                .unwrap_or(true),

            json_logs: env::var("BEACON_JSON_LOGS")
                .map(|v| parse_flag(&v).unwrap_or(false))
                .unwrap_or(is_container),
        }
    }

    /// Reject configurations the subscriber cannot be built from.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.service_name.trim().is_empty() {
            return Err(TelemetryError::Config("service name is empty".to_string()));
        }
        if self.log_level.trim().is_empty() {
            return Err(TelemetryError::Config("log level is empty".to_string()));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
