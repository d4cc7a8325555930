// tcprov/src/cli/verify.rs
use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tcprov_common::arch::resolve_architecture_profile;
use tcprov_common::error::Result;
use tcprov_net::verify_checksum;

#[derive(Args, Debug)]
pub struct Verify {
    /// Path to a downloaded rustup-init
    pub file: PathBuf,

    /// Architecture the file was downloaded for
    #[arg(long)]
    pub arch: String,
}

impl Verify {
    pub fn run(&self) -> Result<()> {
        let profile = resolve_architecture_profile(&self.arch)?;
        verify_checksum(&self.file, profile.sha256)?;
        println!(
            "{} {} matches rustup-init for {}",
            "OK".green().bold(),
            self.file.display(),
            profile.target_triple
        );
        Ok(())
    }
}
