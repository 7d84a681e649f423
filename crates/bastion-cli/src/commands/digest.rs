//! `bastion digest` - fingerprint a plugin file.

use std::path::Path;

use anyhow::{Context, Result};
use bastion_config::Config;
use bastion_crypto::{ContentDigest, DigestAlgorithm};

/// Compute the digest of `file` with `algorithm`, or the configured algorithm.
pub(crate) fn compute(config: &Config, file: &Path, algorithm: Option<&str>) -> Result<ContentDigest> {
    let name = algorithm.unwrap_or(&config.backend.digest_algorithm);
    let algorithm: DigestAlgorithm = name
        .parse()
        .with_context(|| format!("cannot digest with '{name}'"))?;
    let data = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    Ok(ContentDigest::compute(algorithm, &data))
}

/// Print the digest in `sum`-style output.
pub(crate) fn run(config: &Config, file: &Path, algorithm: Option<&str>) -> Result<()> {
    let digest = compute(config, file, algorithm)?;
    println!("{}  {}", digest.to_hex(), file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn uses_configured_algorithm_by_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"print(1);").unwrap();

        let digest = compute(&Config::default(), file.path(), None).unwrap();
        assert_eq!(digest.algorithm(), DigestAlgorithm::Md5);
        assert_eq!(digest.to_hex(), "cee4088e35cc51fdac75295813c0105d");
    }

    #[test]
    fn explicit_algorithm_overrides_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();

        let digest = compute(&Config::default(), file.path(), Some("sha256")).unwrap();
        assert_eq!(
            digest.to_hex(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn unknown_algorithm_and_missing_file_fail() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(compute(&Config::default(), file.path(), Some("sha1")).is_err());

        let dir = tempfile::tempdir().unwrap();
        assert!(compute(&Config::default(), &dir.path().join("absent.js"), None).is_err());
    }
}
