//! Bastion Backend - Defensive consumption of management backend responses.
//!
//! The management backend answers agent heartbeats with JSON payloads that
//! carry configuration, hook whitelists and signed detection plugins. This
//! crate is the trust boundary for those payloads:
//!
//! - [`BackendResponse`] parses a fetched response once and exposes the
//!   transport-level and API-level acceptance gate ([`BackendResponse::verify`]).
//! - Typed, pointer-addressed accessors ([`FieldValue`]) fail closed on
//!   absent or mistyped fields.
//! - [`PluginUpdatePackage`] can only be obtained after the declared digest
//!   matched the delivered source.
//! - [`HookWhitelistMap`] reshapes an object of arrays into a per-hook bypass
//!   list.
//!
//! # Example
//!
//! ```
//! use bastion_backend::{BackendResponse, CollectingSink, ErrorCode};
//!
//! let body = r#"{"status":0,"description":"ok","data":{}}"#;
//! let response = BackendResponse::new(200, "", body);
//! let sink = CollectingSink::new();
//! assert!(response.verify(ErrorCode::Agent, &sink));
//! assert!(response.build_plugin_update_package().is_none());
//! ```
//!
//! Nothing here performs I/O: the HTTP transport hands over
//! `(status, headers, body)` and the caller decides what to do with the
//! extracted values.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod error;
pub mod field;
pub mod plugin;
pub mod pointer;
pub mod report;
pub mod response;
pub mod whitelist;

pub use error::{BackendError, BackendResult, ErrorKind};
pub use field::{FieldAccess, FieldValue, ObjectKeys, ObjectText, StringArray};
pub use plugin::{PluginLayout, PluginUpdatePackage};
pub use pointer::JsonPointer;
pub use report::{CollectingSink, ErrorCode, ErrorReport, ErrorSink, TracingSink};
pub use response::BackendResponse;
pub use whitelist::HookWhitelistMap;
