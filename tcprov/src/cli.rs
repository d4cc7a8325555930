// tcprov/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Parser, Subcommand};
use tcprov_common::config::Config;
use tcprov_common::error::Result;

pub mod detect;
pub mod profiles;
pub mod provision;
pub mod resolve;
pub mod verify;

use crate::cli::detect::DetectArch;
use crate::cli::profiles::Profiles;
use crate::cli::provision::ProvisionArgs;
use crate::cli::resolve::Resolve;
use crate::cli::verify::Verify;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "tcprov", bin_name = "tcprov")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the pinned toolchain and auxiliary tools
    Provision(ProvisionArgs),
    /// Show the installer profile for one architecture
    Resolve(Resolve),
    /// List every supported architecture
    Profiles(Profiles),
    /// Check a downloaded rustup-init against its pinned checksum
    Verify(Verify),
    /// Print the architecture reported by dpkg
    DetectArch(DetectArch),
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Provision(command) => command.run(config).await,
            Self::Resolve(command) => command.run(config),
            Self::Profiles(command) => command.run(),
            Self::Verify(command) => command.run(),
            Self::DetectArch(command) => command.run().await,
        }
    }
}
