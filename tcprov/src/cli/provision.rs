// tcprov/src/cli/provision.rs
use clap::Args;
use colored::Colorize;
use tcprov_common::config::{Config, ProvisioningRequest};
use tcprov_common::error::Result;
use tcprov_core::{
    detect_host_arch, install_auxiliary_tools, Provisioner, SystemCommandRunner, AUXILIARY_TOOLS,
};
use tcprov_net::HttpInstallerSource;
use tracing::debug;

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Host architecture as dpkg names it; detected when omitted
    #[arg(long)]
    pub arch: Option<String>,

    /// Toolchain to install (overrides RUST_VERSION)
    #[arg(long)]
    pub toolchain: Option<String>,

    /// Do not install the auxiliary command-line tools
    #[arg(long)]
    pub skip_aux: bool,
}

impl ProvisionArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let config = match &self.toolchain {
            Some(version) => config.clone().with_toolchain_version(version)?,
            None => config.clone(),
        };

        let runner = SystemCommandRunner;
        let host_arch = match self.arch.clone().or_else(|| config.host_arch_override.clone()) {
            Some(arch) => arch,
            None => detect_host_arch(&runner).await?,
        };
        debug!("Provisioning for host architecture {}", host_arch);

        let request = ProvisioningRequest::new(&config, host_arch);
        let provisioner = Provisioner::new(HttpInstallerSource::new()?, runner, &config);
        let report = provisioner.run(&request).await.into_result()?;

        for version in &report.versions {
            println!("{} {}", "==>".bold().blue(), version);
        }
        println!(
            "{} {}",
            "==>".bold().blue(),
            format!("Rust {} installed", request.toolchain_version).bold()
        );

        if self.skip_aux {
            debug!("Skipping auxiliary tools (--skip-aux)");
            return Ok(());
        }
        for version in install_auxiliary_tools(&runner, &request.roots, &AUXILIARY_TOOLS).await? {
            println!("{} {}", "==>".bold().blue(), version);
        }
        Ok(())
    }
}
