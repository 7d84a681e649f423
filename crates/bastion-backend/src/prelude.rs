//! Prelude module - commonly used types for convenient import.
//!
//! Use `use bastion_backend::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use bastion_backend::prelude::*;
//!
//! let response = BackendResponse::new(200, "", r#"{"status":0}"#);
//! assert!(response.check().is_ok());
//! assert_eq!(response.fetch::<i64>("/status"), Some(0));
//! ```

// Errors
pub use crate::{BackendError, BackendResult, ErrorKind};

// Envelope and field access
pub use crate::{BackendResponse, FieldAccess, FieldValue, JsonPointer};
pub use crate::{ObjectKeys, ObjectText, StringArray};

// Derived records
pub use crate::{HookWhitelistMap, PluginLayout, PluginUpdatePackage};

// Error reporting
pub use crate::{CollectingSink, ErrorCode, ErrorReport, ErrorSink, TracingSink};
