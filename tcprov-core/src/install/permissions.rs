// tcprov-core/src/install/permissions.rs
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tcprov_common::config::InstallRoots;
use tcprov_common::error::{ProvisionError, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

const WORLD_WRITE_BITS: u32 = 0o222;

/// Recursively adds `a+w` to the toolchain home and bin roots, and nothing else.
///
/// Later, unprivileged build steps in the image write into both trees.
/// Symlinks are not followed. Returns the number of entries touched.
pub fn grant_world_writable(roots: &InstallRoots) -> Result<usize> {
    let mut changed = 0;
    for root in roots.as_array() {
        changed += add_write_bits_recursive(root)?;
    }
    info!(
        "Granted world-writable access on {} and {} ({} entries)",
        roots.home.display(),
        roots.bin.display(),
        changed
    );
    Ok(changed)
}

fn add_write_bits_recursive(root: &Path) -> Result<usize> {
    if !root.is_dir() {
        return Err(ProvisionError::InstallationFailure(format!(
            "Installation root {} does not exist after install",
            root.display()
        )));
    }
    let mut changed = 0;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            ProvisionError::InstallationFailure(format!(
                "Failed to walk {}: {e}",
                root.display()
            ))
        })?;
        if entry.path_is_symlink() {
            continue;
        }
        let metadata = entry.metadata().map_err(|e| {
            ProvisionError::InstallationFailure(format!(
                "Failed to stat {}: {e}",
                entry.path().display()
            ))
        })?;
        let mode = metadata.permissions().mode();
        if mode & WORLD_WRITE_BITS != WORLD_WRITE_BITS {
            fs::set_permissions(
                entry.path(),
                fs::Permissions::from_mode(mode | WORLD_WRITE_BITS),
            )
            .map_err(|e| {
                ProvisionError::InstallationFailure(format!(
                    "Failed to make {} writable: {e}",
                    entry.path().display()
                ))
            })?;
            changed += 1;
        }
    }
    debug!("{} entries made writable under {}", changed, root.display());
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use std::os::unix::fs::symlink;

    use super::*;

    fn mode_of(path: &Path) -> u32 {
        fs::symlink_metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn grants_write_to_both_roots_only() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("rustup");
        let bin = tmp.path().join("cargo");
        let outside = tmp.path().join("outside");
        for dir in [&home, &bin.join("bin"), &outside] {
            fs::create_dir_all(dir).unwrap();
        }
        let tool = bin.join("bin/cargo");
        let settings = home.join("settings.toml");
        let untouched = outside.join("keep.txt");
        for file in [&tool, &settings, &untouched] {
            fs::write(file, b"x").unwrap();
            fs::set_permissions(file, fs::Permissions::from_mode(0o644)).unwrap();
        }
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let roots = InstallRoots { home: home.clone(), bin: bin.clone() };
        let changed = grant_world_writable(&roots).unwrap();

        assert!(changed >= 3);
        assert_eq!(mode_of(&tool), 0o777);
        assert_eq!(mode_of(&settings), 0o666);
        assert_eq!(mode_of(&home) & 0o222, 0o222);
        assert_eq!(mode_of(&bin.join("bin")) & 0o222, 0o222);
        assert_eq!(mode_of(&untouched), 0o644);

        // A second pass has nothing left to do.
        assert_eq!(grant_world_writable(&roots).unwrap(), 0);
    }

    #[test]
    fn symlinks_out_of_the_roots_are_not_followed() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("rustup");
        let bin = tmp.path().join("cargo");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&bin).unwrap();
        let target = tmp.path().join("secret.txt");
        fs::write(&target, b"x").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o600)).unwrap();
        symlink(&target, bin.join("link")).unwrap();

        let roots = InstallRoots { home, bin };
        grant_world_writable(&roots).unwrap();
        assert_eq!(mode_of(&target), 0o600);
    }

    #[test]
    fn missing_root_is_an_installation_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let roots = InstallRoots {
            home: tmp.path().join("missing"),
            bin: tmp.path().to_path_buf(),
        };
        assert!(matches!(
            grant_world_writable(&roots),
            Err(ProvisionError::InstallationFailure(_))
        ));
    }
}
