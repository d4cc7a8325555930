// tcprov-core/src/install/staging.rs
//! On-disk handling of the downloaded installer.
//!
//! Bytes only reach the filesystem as a [`VerifiedInstaller`], which can only
//! be obtained by passing the checksum check. The staged file lives in its own
//! temporary directory and is removed on every path out of the install step.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tcprov_common::arch::{ArchitectureProfile, INSTALLER_FILE_NAME};
use tcprov_common::error::{ProvisionError, Result};
use tcprov_net::validation::verify_integrity;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Installer bytes whose SHA-256 matched the profile's pinned digest.
#[derive(Debug)]
pub struct VerifiedInstaller {
    bytes: Vec<u8>,
    target_triple: String,
}

impl VerifiedInstaller {
    pub fn verify(bytes: Vec<u8>, profile: &ArchitectureProfile) -> Result<Self> {
        verify_integrity(&bytes, profile.sha256)?;
        debug!(
            "rustup-init for {} verified ({} bytes)",
            profile.target_triple,
            bytes.len()
        );
        Ok(Self {
            bytes,
            target_triple: profile.target_triple.to_string(),
        })
    }
}

/// An executable copy of a verified installer in a private temp directory.
#[derive(Debug)]
pub struct StagedInstaller {
    dir: Option<TempDir>,
    path: PathBuf,
    target_triple: String,
}

impl StagedInstaller {
    pub fn stage(installer: VerifiedInstaller, tmp_root: &Path) -> Result<Self> {
        fs::create_dir_all(tmp_root).map_err(|e| {
            ProvisionError::InstallationFailure(format!(
                "Failed to create staging directory {}: {e}",
                tmp_root.display()
            ))
        })?;
        let dir = tempfile::Builder::new()
            .prefix("tcprov-")
            .tempdir_in(tmp_root)
            .map_err(|e| {
                ProvisionError::InstallationFailure(format!(
                    "Failed to create temporary directory in {}: {e}",
                    tmp_root.display()
                ))
            })?;
        let path = dir.path().join(INSTALLER_FILE_NAME);

        fs::write(&path, &installer.bytes).map_err(|e| {
            ProvisionError::InstallationFailure(format!(
                "Failed to write installer to {}: {e}",
                path.display()
            ))
        })?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).map_err(|e| {
            ProvisionError::InstallationFailure(format!(
                "Failed to mark {} executable: {e}",
                path.display()
            ))
        })?;
        debug!("Staged installer at {}", path.display());

        Ok(Self {
            dir: Some(dir),
            path,
            target_triple: installer.target_triple,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn target_triple(&self) -> &str {
        &self.target_triple
    }

    /// Deletes the installer and its directory.
    pub fn remove(mut self) -> Result<()> {
        let removal_failed = |e: std::io::Error| {
            ProvisionError::InstallationFailure(format!(
                "Failed to remove staged installer {}: {e}",
                self.path.display()
            ))
        };
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(removal_failed(e));
            }
        }
        if let Some(dir) = self.dir.take() {
            dir.close().map_err(removal_failed)?;
        }
        debug!("Removed staged installer {}", self.path.display());
        Ok(())
    }
}

impl Drop for StagedInstaller {
    fn drop(&mut self) {
        // Only reached when `remove` was skipped by an early return.
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                warn!(
                    "Could not remove staged installer {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_profile, FIXTURE_INSTALLER};

    #[test]
    fn tampered_bytes_never_become_a_verified_installer() {
        let mut bytes = FIXTURE_INSTALLER.to_vec();
        bytes[0] ^= 0xff;
        let result = VerifiedInstaller::verify(bytes, fixture_profile());
        assert!(matches!(
            result,
            Err(ProvisionError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn staged_installer_is_executable_and_removable() {
        let tmp = tempfile::tempdir().unwrap();
        let verified =
            VerifiedInstaller::verify(FIXTURE_INSTALLER.to_vec(), fixture_profile()).unwrap();
        let staged = StagedInstaller::stage(verified, tmp.path()).unwrap();

        let path = staged.path().to_path_buf();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert_eq!(fs::read(&path).unwrap(), FIXTURE_INSTALLER);

        staged.remove().unwrap();
        assert!(!path.exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn unusable_staging_root_is_an_installation_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let not_a_dir = tmp.path().join("occupied");
        fs::write(&not_a_dir, b"file, not directory").unwrap();
        let verified =
            VerifiedInstaller::verify(FIXTURE_INSTALLER.to_vec(), fixture_profile()).unwrap();

        match StagedInstaller::stage(verified, &not_a_dir) {
            Err(ProvisionError::InstallationFailure(reason)) => {
                assert!(reason.contains("occupied"), "{reason}")
            }
            other => panic!("expected InstallationFailure, got {other:?}"),
        }
    }

    #[test]
    fn dropping_a_staged_installer_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let verified =
            VerifiedInstaller::verify(FIXTURE_INSTALLER.to_vec(), fixture_profile()).unwrap();
        let path = {
            let staged = StagedInstaller::stage(verified, tmp.path()).unwrap();
            staged.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
