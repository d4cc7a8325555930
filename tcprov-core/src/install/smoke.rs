// tcprov-core/src/install/smoke.rs
use tcprov_common::config::InstallRoots;
use tcprov_common::error::{ProvisionError, Result};
use tracing::{error, info};

use crate::process::{CommandRunner, CommandSpec};

/// Binaries every finished install must be able to run.
pub const SMOKE_TEST_TOOLS: [&str; 3] = ["rustup", "cargo", "rustc"];

/// Runs `<tool> --version` for each installed tool, in order.
///
/// Stops at the first tool that cannot report its version. Returns the
/// reported version lines.
pub async fn smoke_test<R: CommandRunner>(
    runner: &R,
    roots: &InstallRoots,
    tools: &[&str],
) -> Result<Vec<String>> {
    let mut versions = Vec::with_capacity(tools.len());
    for tool in tools {
        versions.push(query_version(runner, roots, tool).await?);
    }
    Ok(versions)
}

/// `<bin root>/bin/<tool> --version`, requiring exit code 0.
pub async fn query_version<R: CommandRunner>(
    runner: &R,
    roots: &InstallRoots,
    tool: &str,
) -> Result<String> {
    let spec = CommandSpec::new(roots.tool_path(tool))
        .arg("--version")
        .envs(roots.envs());
    let output = runner.run(&spec).await.map_err(|e| {
        error!("Could not run {}: {}", spec, e);
        ProvisionError::PostInstallVerificationFailed(format!("`{spec}` could not be run: {e}"))
    })?;
    if !output.success() {
        error!("{} failed with {}", spec, output.status_text());
        return Err(ProvisionError::PostInstallVerificationFailed(format!(
            "`{spec}` failed with {}: {}",
            output.status_text(),
            output.stderr_tail()
        )));
    }
    let version = output.stdout.lines().next().unwrap_or("").trim().to_string();
    info!("{}", if version.is_empty() { tool } else { version.as_str() });
    Ok(version)
}
