// tcprov/src/cli/profiles.rs
use clap::Args;
use colored::Colorize;
use tcprov_common::arch::{ARCHITECTURE_PROFILES, RUSTUP_VERSION};
use tcprov_common::error::Result;

#[derive(Args, Debug)]
pub struct Profiles {
    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

impl Profiles {
    pub fn run(&self) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&ARCHITECTURE_PROFILES[..])?);
            return Ok(());
        }
        println!("{}", format!("rustup-init {RUSTUP_VERSION}").bold());
        for profile in &ARCHITECTURE_PROFILES {
            println!(
                "{:<8} {:<32} {}",
                profile.arch.as_str().cyan(),
                profile.target_triple,
                profile.sha256
            );
        }
        Ok(())
    }
}
