//! Bastion Telemetry - Logging for bastion tooling.
//!
//! Library crates only emit `tracing` events; binaries call
//! [`setup_logging`] once at startup to install a subscriber.
//!
//! # Example
//!
//! ```rust,no_run
//! use bastion_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), bastion_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Json)
//!     .with_directive("bastion_backend=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_logging};
