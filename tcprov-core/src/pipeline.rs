// tcprov-core/src/pipeline.rs
//! The provisioning run: resolve, fetch, verify, install, smoke-test.
//!
//! Strictly sequential and single-attempt. Each stage's output is the next
//! stage's precondition, and any error moves the run straight to `Failed`.

use std::fmt;
use std::path::PathBuf;

use tcprov_common::arch::{resolve_in, ArchitectureProfile, ARCHITECTURE_PROFILES};
use tcprov_common::config::{Config, ProvisioningRequest};
use tcprov_common::error::{ProvisionError, Result};
use tcprov_net::http::{fetch_installer, InstallerSource};
use tracing::{error, info};

use crate::install::{
    run_installer, smoke_test, StagedInstaller, VerifiedInstaller, SMOKE_TEST_TOOLS,
};
use crate::process::CommandRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ArchitectureResolved,
    Downloaded,
    Verified,
    Installed,
    SmokeTested,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::ArchitectureResolved => "architecture resolved",
            Stage::Downloaded => "downloaded",
            Stage::Verified => "verified",
            Stage::Installed => "installed",
            Stage::SmokeTested => "smoke-tested",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub enum InstallationOutcome {
    Done,
    /// `stage` is the last stage reached before `reason` occurred.
    Failed {
        stage: Stage,
        reason: ProvisionError,
    },
}

impl InstallationOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, InstallationOutcome::Done)
    }
}

/// Everything observable about one run.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub stages: Vec<Stage>,
    pub profile: Option<ArchitectureProfile>,
    pub installer_path: Option<PathBuf>,
    pub versions: Vec<String>,
    pub outcome: InstallationOutcome,
}

impl ProvisionReport {
    fn new() -> Self {
        Self {
            stages: vec![Stage::Start],
            profile: None,
            installer_path: None,
            versions: Vec::new(),
            outcome: InstallationOutcome::Done,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Start)
    }

    fn advance(&mut self, stage: Stage) {
        info!("==> {}", stage);
        self.stages.push(stage);
    }

    /// Converts a failed outcome back into its error.
    pub fn into_result(self) -> Result<Self> {
        match &self.outcome {
            InstallationOutcome::Done => Ok(self),
            InstallationOutcome::Failed { reason, .. } => Err(reason.clone()),
        }
    }
}

pub struct Provisioner<S, R> {
    source: S,
    runner: R,
    base_url: String,
    tmp_dir: PathBuf,
    profiles: &'static [ArchitectureProfile],
}

impl<S: InstallerSource, R: CommandRunner> Provisioner<S, R> {
    pub fn new(source: S, runner: R, config: &Config) -> Self {
        Self {
            source,
            runner,
            base_url: config.dist_server.clone(),
            tmp_dir: config.tmp_dir.clone(),
            profiles: &ARCHITECTURE_PROFILES,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_profiles(mut self, profiles: &'static [ArchitectureProfile]) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn run(&self, request: &ProvisioningRequest) -> ProvisionReport {
        let mut report = ProvisionReport::new();
        match self.drive(request, &mut report).await {
            Ok(()) => {
                report.advance(Stage::Done);
                report.outcome = InstallationOutcome::Done;
            }
            Err(reason) => {
                error!(
                    "Provisioning failed after stage '{}': {}",
                    report.stage(),
                    reason
                );
                report.outcome = InstallationOutcome::Failed {
                    stage: report.stage(),
                    reason,
                };
            }
        }
        report
    }

    async fn drive(&self, request: &ProvisioningRequest, report: &mut ProvisionReport) -> Result<()> {
        let profile = resolve_in(self.profiles, &request.host_arch)?;
        report.profile = Some(profile.clone());
        report.advance(Stage::ArchitectureResolved);

        let bytes = fetch_installer(&self.source, profile, &self.base_url).await?;
        report.advance(Stage::Downloaded);

        let installer = VerifiedInstaller::verify(bytes, profile)?;
        report.advance(Stage::Verified);

        let staged = StagedInstaller::stage(installer, &self.tmp_dir)?;
        report.installer_path = Some(staged.path().to_path_buf());
        run_installer(&self.runner, staged, request).await?;
        report.advance(Stage::Installed);

        report.versions = smoke_test(&self.runner, &request.roots, &SMOKE_TEST_TOOLS).await?;
        report.advance(Stage::SmokeTested);
        Ok(())
    }
}
