//! # Beacon Telemetry
//!
//! Structured logging for the random beacon.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use beacon_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BEACON_SERVICE_NAME` | `random-beacon` | Service name attached to every log line |
//! | `BEACON_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `BEACON_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `BEACON_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Structured log line tagged with the emitting subsystem.
///
/// ```rust,ignore
/// log_event!(info, "relay", "relay entry submitted", request_id = 7);
/// ```
#[macro_export]
macro_rules! log_event {
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a relay request event with standard fields.
#[macro_export]
macro_rules! log_relay_event {
    ($level:ident, $msg:expr, $request_id:expr, $group_index:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = "relay",
            request_id = $request_id,
            group_index = $group_index,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a group creation event with standard fields.
#[macro_export]
macro_rules! log_dkg_event {
    ($level:ident, $msg:expr, $start_block:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = "dkg",
            start_block = $start_block,
            $($($field)*,)?
            $msg
        )
    };
}
