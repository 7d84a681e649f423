//! Bastion Crypto - Content digests for the backend protocol layer.
//!
//! This crate provides:
//! - Digest algorithms understood by the management backend (MD5, SHA-256, BLAKE3)
//! - Lowercase hex rendering of computed digests
//! - Constant-time comparison against a declared hex digest
//!
//! # Example
//!
//! ```
//! use bastion_crypto::{ContentDigest, DigestAlgorithm};
//!
//! let source = b"print(1);";
//! let digest = ContentDigest::compute(DigestAlgorithm::Md5, source);
//! assert!(digest.matches_hex(&digest.to_hex()));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod digest;
mod error;

pub use digest::{ContentDigest, DigestAlgorithm};
pub use error::{CryptoError, CryptoResult};
