//! Integrity-checked plugin packages.
//!
//! The backend ships detection plugins as source text together with a hex
//! digest and a version. A [`PluginUpdatePackage`] only exists once the
//! digest recomputed over the source equals the declared one and the version
//! is present, so holding a package is proof that both checks ran.

use bastion_crypto::{ContentDigest, DigestAlgorithm};
use serde::Serialize;
use serde::ser::SerializeStruct;
use tracing::{debug, warn};

use crate::error::{BackendError, BackendResult};
use crate::field::FieldAccess;

/// Where the plugin fields live in a response, and how they are digested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginLayout {
    /// Pointer to the plugin source string.
    pub source_path: String,
    /// Pointer to the declared hex digest.
    pub digest_path: String,
    /// Pointer to the plugin version string.
    pub version_path: String,
    /// Algorithm the declared digest was computed with.
    pub algorithm: DigestAlgorithm,
}

impl Default for PluginLayout {
    fn default() -> Self {
        Self {
            source_path: "/data/plugin/plugin".to_string(),
            digest_path: "/data/plugin/md5".to_string(),
            version_path: "/data/plugin/version".to_string(),
            algorithm: DigestAlgorithm::Md5,
        }
    }
}

/// A verified, versioned plugin ready for the loader.
#[derive(Clone, PartialEq, Eq)]
pub struct PluginUpdatePackage {
    source_code: String,
    version: String,
    digest: String,
    algorithm: DigestAlgorithm,
}

impl PluginUpdatePackage {
    /// Extract and verify a package.
    ///
    /// `Ok(None)` means the source or digest field is absent, i.e. no update
    /// is on offer. The digest is checked before the version is looked at.
    pub(crate) fn extract(
        access: &impl FieldAccess,
        layout: &PluginLayout,
    ) -> BackendResult<Option<Self>> {
        let source = access.fetch::<String>(&layout.source_path);
        let declared = access.fetch::<String>(&layout.digest_path);
        let (Some(source_code), Some(declared)) = (source, declared) else {
            debug!(
                source_path = %layout.source_path,
                digest_path = %layout.digest_path,
                "no plugin update offered"
            );
            return Ok(None);
        };

        let computed = ContentDigest::compute(layout.algorithm, source_code.as_bytes());
        if !computed.matches_hex(&declared) {
            warn!(
                algorithm = %layout.algorithm,
                digest_path = %layout.digest_path,
                "plugin digest mismatch"
            );
            return Err(BackendError::IntegrityMismatch {
                declared,
                computed: computed.to_hex(),
            });
        }

        let version = match access.fetch::<String>(&layout.version_path) {
            Some(v) if !v.is_empty() => v,
            _ => {
                debug!(version_path = %layout.version_path, "verified plugin has no version");
                return Err(BackendError::FieldAbsentOrMismatched {
                    path: layout.version_path.clone(),
                    expected: "a non-empty string",
                });
            },
        };

        Ok(Some(Self {
            source_code,
            version,
            digest: declared,
            algorithm: layout.algorithm,
        }))
    }

    /// Plugin source text.
    #[must_use]
    pub fn source_code(&self) -> &str {
        &self.source_code
    }

    /// Plugin version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Verified lowercase hex digest.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Algorithm the digest was verified with.
    #[must_use]
    pub const fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Consume the package, returning the source text.
    #[must_use]
    pub fn into_source_code(self) -> String {
        self.source_code
    }
}

impl std::fmt::Debug for PluginUpdatePackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginUpdatePackage")
            .field("version", &self.version)
            .field("digest", &self.digest)
            .field("algorithm", &self.algorithm)
            .field("source_len", &self.source_code.len())
            .finish()
    }
}

// Metadata only; the source text stays with the loader.
impl Serialize for PluginUpdatePackage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PluginUpdatePackage", 4)?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("digest", &self.digest)?;
        state.serialize_field("algorithm", &self.algorithm)?;
        state.serialize_field("source_len", &self.source_code.len())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::{Value, json};
    use tracing_test::traced_test;

    const SOURCE: &str = "print(1);";
    const SOURCE_MD5: &str = "cee4088e35cc51fdac75295813c0105d";

    fn body(plugin: Value) -> Value {
        json!({"status": 0, "data": {"plugin": plugin}})
    }

    #[test]
    fn builds_verified_package() {
        let doc = body(json!({"plugin": SOURCE, "md5": SOURCE_MD5, "version": "2024-01-01"}));
        let package = PluginUpdatePackage::extract(&doc, &PluginLayout::default())
            .unwrap()
            .unwrap();
        assert_eq!(package.source_code(), SOURCE);
        assert_eq!(package.version(), "2024-01-01");
        assert_eq!(package.digest(), SOURCE_MD5);
        assert_eq!(package.algorithm(), DigestAlgorithm::Md5);
    }

    #[test]
    fn absent_fields_mean_no_offer() {
        let layout = PluginLayout::default();
        let doc = body(json!({"md5": SOURCE_MD5, "version": "1"}));
        assert!(PluginUpdatePackage::extract(&doc, &layout).unwrap().is_none());

        let doc = body(json!({"plugin": SOURCE, "version": "1"}));
        assert!(PluginUpdatePackage::extract(&doc, &layout).unwrap().is_none());

        let doc = json!({"data": {}});
        assert!(PluginUpdatePackage::extract(&doc, &layout).unwrap().is_none());
    }

    #[test]
    fn mistyped_fields_mean_no_offer() {
        let doc = body(json!({"plugin": 42, "md5": SOURCE_MD5, "version": "1"}));
        assert!(
            PluginUpdatePackage::extract(&doc, &PluginLayout::default())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn digest_mismatch_is_checked_before_version() {
        // Version is absent too, but the integrity failure wins.
        let doc = body(json!({"plugin": "print(2);", "md5": SOURCE_MD5}));
        let err = PluginUpdatePackage::extract(&doc, &PluginLayout::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IntegrityMismatch);
    }

    #[test]
    #[traced_test]
    fn digest_mismatch_is_logged_as_warning() {
        let doc = body(json!({"plugin": "print(2);", "md5": SOURCE_MD5, "version": "1"}));
        assert!(PluginUpdatePackage::extract(&doc, &PluginLayout::default()).is_err());
        assert!(logs_contain("WARN"));
        assert!(logs_contain("plugin digest mismatch"));
    }

    #[test]
    fn missing_or_empty_version_is_rejected() {
        let layout = PluginLayout::default();
        for plugin in [
            json!({"plugin": SOURCE, "md5": SOURCE_MD5}),
            json!({"plugin": SOURCE, "md5": SOURCE_MD5, "version": ""}),
            json!({"plugin": SOURCE, "md5": SOURCE_MD5, "version": 3}),
        ] {
            let err = PluginUpdatePackage::extract(&body(plugin), &layout).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::FieldAbsentOrMismatched);
        }
    }

    #[test]
    fn custom_layout_with_sha256() {
        let layout = PluginLayout {
            source_path: "/plugin/source".to_string(),
            digest_path: "/plugin/sha256".to_string(),
            version_path: "/plugin/version".to_string(),
            algorithm: DigestAlgorithm::Sha256,
        };
        let digest = ContentDigest::compute(DigestAlgorithm::Sha256, SOURCE.as_bytes()).to_hex();
        let doc = json!({"plugin": {"source": SOURCE, "sha256": digest, "version": "7"}});
        let package = PluginUpdatePackage::extract(&doc, &layout).unwrap().unwrap();
        assert_eq!(package.algorithm(), DigestAlgorithm::Sha256);

        // The MD5 of the same source does not satisfy a SHA-256 layout.
        let doc = json!({"plugin": {"source": SOURCE, "sha256": SOURCE_MD5, "version": "7"}});
        assert!(PluginUpdatePackage::extract(&doc, &layout).is_err());
    }

    #[test]
    fn serialize_and_debug_omit_source() {
        let doc = body(json!({"plugin": SOURCE, "md5": SOURCE_MD5, "version": "1.2"}));
        let package = PluginUpdatePackage::extract(&doc, &PluginLayout::default())
            .unwrap()
            .unwrap();

        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(
            json,
            json!({"version": "1.2", "digest": SOURCE_MD5, "algorithm": "md5", "source_len": 9})
        );
        assert!(!format!("{package:?}").contains(SOURCE));
        assert_eq!(package.into_source_code(), SOURCE);
    }
}
