//! # Blocklist Telemetry
//!
//! Structured logging for the blocked number store and its tools.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blocklist_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//!
//!     // Application code here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BLOCKLIST_SERVICE_NAME` | `blocklist` | Service name on every log line |
//! | `BLOCKLIST_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `BLOCKLIST_JSON_LOGS` | `false` | JSON formatted output |
//! | `BLOCKLIST_LOG_TARGET` | `true` | Include event targets |

mod config;
mod logging;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TelemetryError {
    /// A global subscriber is already installed for this process.
    #[error("Telemetry already initialized")]
    AlreadyInitialized,

    /// The configuration could not be turned into a subscriber.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
///
/// Returns a guard to hold for the lifetime of the application. Only the
/// first call in a process succeeds; later calls return
/// [`TelemetryError::AlreadyInitialized`].
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;

    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    /// Service name the guard was created for.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!(service = %self.service_name, "Shutting down telemetry");
    }
}
