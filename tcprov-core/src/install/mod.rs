// tcprov-core/src/install/mod.rs
pub mod permissions;
pub mod smoke;
pub mod staging;

use tcprov_common::config::ProvisioningRequest;
use tcprov_common::error::{ProvisionError, Result};
use tracing::{debug, error, info};

use crate::process::{CommandRunner, CommandSpec};
pub use permissions::grant_world_writable;
pub use smoke::{query_version, smoke_test, SMOKE_TEST_TOOLS};
pub use staging::{StagedInstaller, VerifiedInstaller};

/// Unattended rustup-init arguments for one pinned toolchain.
pub fn installer_args(toolchain_version: &str, target_triple: &str) -> Vec<String> {
    [
        "-y",
        "--no-modify-path",
        "--profile",
        "minimal",
        "--default-toolchain",
        toolchain_version,
        "--default-host",
        target_triple,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Runs a staged installer, then removes it.
///
/// The staged file is deleted whether or not the installer succeeded. On
/// success the installation roots are made world-writable.
pub async fn run_installer<R: CommandRunner>(
    runner: &R,
    staged: StagedInstaller,
    request: &ProvisioningRequest,
) -> Result<()> {
    let spec = CommandSpec::new(staged.path())
        .args(installer_args(
            &request.toolchain_version,
            staged.target_triple(),
        ))
        .envs(request.roots.envs());
    info!(
        "Installing Rust {} for {}",
        request.toolchain_version,
        staged.target_triple()
    );

    let run_result = runner.run(&spec).await;
    let cleanup_result = staged.remove();

    let output = run_result.map_err(|e| {
        ProvisionError::InstallationFailure(format!("rustup-init could not be started: {e}"))
    })?;
    if !output.success() {
        error!("rustup-init failed with {}", output.status_text());
        return Err(ProvisionError::InstallationFailure(format!(
            "rustup-init failed with {}: {}",
            output.status_text(),
            output.stderr_tail()
        )));
    }
    cleanup_result?;
    debug!("rustup-init completed, installer removed");

    grant_world_writable(&request.roots)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installer_arguments_are_unattended_and_pinned() {
        assert_eq!(
            installer_args("1.79.0", "aarch64-unknown-linux-gnu"),
            [
                "-y",
                "--no-modify-path",
                "--profile",
                "minimal",
                "--default-toolchain",
                "1.79.0",
                "--default-host",
                "aarch64-unknown-linux-gnu",
            ]
        );
    }
}
