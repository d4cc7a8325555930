// tcprov-core/src/lib.rs
pub mod aux_tools;
pub mod host;
pub mod install;
pub mod pipeline;
pub mod process;

#[cfg(test)]
pub(crate) mod testing;

pub use aux_tools::{install_auxiliary_tools, AuxiliaryTool, AUXILIARY_TOOLS};
pub use host::detect_host_arch;
pub use pipeline::{InstallationOutcome, ProvisionReport, Provisioner, Stage};
pub use process::{CommandOutput, CommandRunner, CommandSpec, SystemCommandRunner};
