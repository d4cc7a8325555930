// tcprov/src/cli/resolve.rs
use clap::Args;
use colored::Colorize;
use tcprov_common::arch::{resolve_architecture_profile, RUSTUP_VERSION};
use tcprov_common::config::Config;
use tcprov_common::error::Result;
use tcprov_net::installer_url;

#[derive(Args, Debug)]
pub struct Resolve {
    /// Architecture identifier, e.g. amd64
    pub arch: String,
}

impl Resolve {
    pub fn run(&self, config: &Config) -> Result<()> {
        let profile = resolve_architecture_profile(&self.arch)?;
        println!("{:<10} {}", "arch:".bold(), profile.arch);
        println!("{:<10} {}", "triple:".bold(), profile.target_triple);
        println!("{:<10} {}", "rustup:".bold(), RUSTUP_VERSION);
        println!("{:<10} {}", "sha256:".bold(), profile.sha256);
        println!(
            "{:<10} {}",
            "url:".bold(),
            installer_url(&config.dist_server, profile)
        );
        Ok(())
    }
}
