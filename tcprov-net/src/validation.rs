// tcprov-net/src/validation.rs
use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tcprov_common::error::{ProvisionError, Result};
use url::Url;

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Verifies the SHA-256 of an in-memory artifact against `expected`.
///
/// The digest always covers the whole buffer. A mismatch is a hard failure and
/// there is no switch to turn it off.
pub fn verify_integrity(bytes: &[u8], expected: &str) -> Result<()> {
    let actual = sha256_hex(bytes);
    tracing::debug!("Calculated SHA256: {} ({} bytes)", actual, bytes.len());
    tracing::debug!("Expected SHA256:   {}", expected);
    compare_digest("installer artifact", &actual, expected)
}

/// Verifies the SHA-256 checksum of a file on disk.
pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    tracing::debug!("Verifying checksum for: {}", path.display());
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let bytes_copied = io::copy(&mut file, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());
    tracing::debug!(
        "Calculated SHA256: {} ({} bytes read)",
        actual,
        bytes_copied
    );
    compare_digest(&path.display().to_string(), &actual, expected)
}

fn compare_digest(subject: &str, actual: &str, expected: &str) -> Result<()> {
    let expected = expected.trim();
    // An empty expectation must never pass.
    if !expected.is_empty() && actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        tracing::error!("Checksum mismatch for {}", subject);
        Err(ProvisionError::ChecksumMismatch {
            subject: subject.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Validates a URL, ensuring it uses the HTTPS scheme.
pub fn validate_url(url_str: &str) -> Result<()> {
    let url = Url::parse(url_str).map_err(|e| {
        ProvisionError::ValidationError(format!("Failed to parse URL '{url_str}': {e}"))
    })?;
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(ProvisionError::ValidationError(format!(
            "Invalid URL scheme for '{}': Must be https, but got '{}'",
            url_str,
            url.scheme()
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const FIXTURE: &[u8] = b"#!/bin/sh\nexit 0\n";
    const FIXTURE_SHA256: &str = "306c6ca7407560340797866e077e053627ad409277d1b9da58106fce4cf717cb";

    #[test]
    fn matching_digest_verifies_repeatedly() {
        for _ in 0..3 {
            verify_integrity(FIXTURE, FIXTURE_SHA256).unwrap();
        }
        verify_integrity(FIXTURE, &FIXTURE_SHA256.to_uppercase()).unwrap();
    }

    #[test]
    fn single_flipped_byte_is_rejected() {
        for index in 0..FIXTURE.len() {
            let mut tampered = FIXTURE.to_vec();
            tampered[index] ^= 0x01;
            match verify_integrity(&tampered, FIXTURE_SHA256) {
                Err(ProvisionError::ChecksumMismatch { expected, actual, .. }) => {
                    assert_eq!(expected, FIXTURE_SHA256);
                    assert_ne!(actual, FIXTURE_SHA256);
                }
                other => panic!("byte {index}: expected ChecksumMismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn truncated_or_empty_expectation_is_rejected() {
        assert!(verify_integrity(FIXTURE, "").is_err());
        assert!(verify_integrity(FIXTURE, &FIXTURE_SHA256[..32]).is_err());
        assert!(verify_integrity(&FIXTURE[..FIXTURE.len() - 1], FIXTURE_SHA256).is_err());
    }

    #[test]
    fn file_checksum_matches_in_memory_digest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE).unwrap();
        verify_checksum(file.path(), FIXTURE_SHA256).unwrap();
        assert!(matches!(
            verify_checksum(file.path(), &"0".repeat(64)),
            Err(ProvisionError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn only_https_urls_are_accepted() {
        validate_url("https://static.rust-lang.org/rustup/archive/1.27.1/x/rustup-init").unwrap();
        assert!(matches!(
            validate_url("http://static.rust-lang.org/rustup-init"),
            Err(ProvisionError::ValidationError(_))
        ));
        assert!(matches!(
            validate_url("not a url"),
            Err(ProvisionError::ValidationError(_))
        ));
    }
}
