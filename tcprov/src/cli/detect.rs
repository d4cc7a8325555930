// tcprov/src/cli/detect.rs
use clap::Args;
use tcprov_common::error::Result;
use tcprov_core::{detect_host_arch, SystemCommandRunner};

#[derive(Args, Debug)]
pub struct DetectArch;

impl DetectArch {
    pub async fn run(&self) -> Result<()> {
        println!("{}", detect_host_arch(&SystemCommandRunner).await?);
        Ok(())
    }
}
