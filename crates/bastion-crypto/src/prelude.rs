//! Prelude module - commonly used types for convenient import.
//!
//! Use `use bastion_crypto::prelude::*;` to import all essential types.

// Errors
pub use crate::{CryptoError, CryptoResult};

// Digests
pub use crate::{ContentDigest, DigestAlgorithm};
