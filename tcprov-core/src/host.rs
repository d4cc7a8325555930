// tcprov-core/src/host.rs
use tcprov_common::error::{ProvisionError, Result};
use tracing::debug;

use crate::process::{CommandRunner, CommandSpec};

/// Asks the OS package subsystem which architecture this host is.
///
/// The answer is taken verbatim (trimmed); mapping it to an installer is
/// the architecture table's job.
pub async fn detect_host_arch<R: CommandRunner>(runner: &R) -> Result<String> {
    let spec = CommandSpec::new("dpkg").arg("--print-architecture");
    let output = runner.run(&spec).await?;
    if !output.success() {
        return Err(ProvisionError::CommandExecError(format!(
            "`{spec}` failed with {}: {}",
            output.status_text(),
            output.stderr_tail()
        )));
    }
    let arch = output.stdout.trim().to_string();
    if arch.is_empty() {
        return Err(ProvisionError::CommandExecError(format!(
            "`{spec}` printed no architecture"
        )));
    }
    debug!("dpkg reports host architecture {}", arch);
    Ok(arch)
}
