// tcprov-core/src/aux_tools.rs
//! Command-line utilities installed through the freshly provisioned cargo.

use tcprov_common::config::InstallRoots;
use tcprov_common::error::{ProvisionError, Result};
use tracing::{error, info};

use crate::install::query_version;
use crate::process::{CommandRunner, CommandSpec};

/// A crate installed with `cargo install`, pinned to one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxiliaryTool {
    pub name: &'static str,
    pub version: &'static str,
    pub role: &'static str,
}

pub const AUXILIARY_TOOLS: [AuxiliaryTool; 2] = [
    AuxiliaryTool {
        name: "rust-script",
        version: "0.35.0",
        role: "script-runner",
    },
    AuxiliaryTool {
        name: "just",
        version: "1.36.0",
        role: "task-runner",
    },
];

pub fn cargo_install_spec(roots: &InstallRoots, tool: &AuxiliaryTool) -> CommandSpec {
    CommandSpec::new(roots.tool_path("cargo"))
        .args(["install", "--locked", "--version", tool.version, tool.name])
        .envs(roots.envs())
}

/// Installs each tool and checks it reports a version. Tools are independent;
/// they run one after the other and the first failure aborts.
pub async fn install_auxiliary_tools<R: CommandRunner>(
    runner: &R,
    roots: &InstallRoots,
    tools: &[AuxiliaryTool],
) -> Result<Vec<String>> {
    let mut versions = Vec::with_capacity(tools.len());
    for tool in tools {
        info!("Installing {} {} ({})", tool.name, tool.version, tool.role);
        let spec = cargo_install_spec(roots, tool);
        let output = runner.run(&spec).await.map_err(|e| {
            ProvisionError::InstallationFailure(format!("`{spec}` could not be run: {e}"))
        })?;
        if !output.success() {
            error!("cargo install {} failed with {}", tool.name, output.status_text());
            return Err(ProvisionError::InstallationFailure(format!(
                "cargo install {} {} failed with {}: {}",
                tool.name,
                tool.version,
                output.status_text(),
                output.stderr_tail()
            )));
        }
        versions.push(query_version(runner, roots, tool.name).await?);
    }
    Ok(versions)
}
