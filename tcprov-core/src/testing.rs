// tcprov-core/src/testing.rs
//! Fakes for the process and download seams.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tcprov_common::arch::{ArchitectureProfile, HostArch};
use tcprov_common::config::InstallRoots;
use tcprov_common::error::{ProvisionError, Result};
use tcprov_net::http::InstallerSource;

use crate::process::{CommandOutput, CommandRunner, CommandSpec};

pub const FIXTURE_INSTALLER: &[u8] = b"#!/bin/sh\nexit 0\n";
pub const FIXTURE_SHA256: &str = "306c6ca7407560340797866e077e053627ad409277d1b9da58106fce4cf717cb";

pub static FIXTURE_PROFILES: [ArchitectureProfile; 1] = [ArchitectureProfile {
    arch: HostArch::Amd64,
    target_triple: "x86_64-unknown-linux-gnu",
    sha256: FIXTURE_SHA256,
}];

pub fn fixture_profile() -> &'static ArchitectureProfile {
    &FIXTURE_PROFILES[0]
}

/// Roots under `base`, created on disk.
pub fn test_roots(base: &Path) -> InstallRoots {
    let roots = InstallRoots {
        home: base.join("rustup"),
        bin: base.join("cargo"),
    };
    fs::create_dir_all(&roots.home).unwrap();
    fs::create_dir_all(roots.bin_dir()).unwrap();
    roots
}

/// Serves fixed bytes and remembers every requested URL.
#[derive(Debug, Default)]
pub struct FakeSource {
    bytes: Vec<u8>,
    fail: bool,
    fetched: RefCell<Vec<String>>,
}

impl FakeSource {
    pub fn serving(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl InstallerSource for FakeSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetched.borrow_mut().push(url.to_string());
        if self.fail {
            return Err(ProvisionError::DownloadError(
                url.to_string(),
                "server responded with HTTP 503 Service Unavailable".to_string(),
            ));
        }
        Ok(self.bytes.clone())
    }
}

/// Records commands instead of running them. Every program exits 0 and
/// prints `<name> 0.0.0-test` unless scripted otherwise.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    exit_codes: HashMap<String, i32>,
    stdouts: HashMap<String, String>,
    calls: RefCell<Vec<CommandSpec>>,
    /// Permission bits of each program file that existed when it was invoked.
    modes: RefCell<Vec<(String, u32)>>,
}

impl ScriptedRunner {
    pub fn exit_code(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_string(), code);
        self
    }

    pub fn stdout(mut self, program: &str, stdout: &str) -> Self {
        self.stdouts.insert(program.to_string(), stdout.to_string());
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    pub fn program_names(&self) -> Vec<String> {
        self.calls.borrow().iter().map(CommandSpec::program_name).collect()
    }

    pub fn mode_at_invocation(&self, program: &str) -> Option<u32> {
        self.modes
            .borrow()
            .iter()
            .find(|(name, _)| name == program)
            .map(|(_, mode)| *mode)
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let name = spec.program_name();
        if let Ok(metadata) = fs::metadata(&spec.program) {
            self.modes
                .borrow_mut()
                .push((name.clone(), metadata.permissions().mode() & 0o777));
        }
        self.calls.borrow_mut().push(spec.clone());
        let code = self.exit_codes.get(&name).copied().unwrap_or(0);
        let stdout = self
            .stdouts
            .get(&name)
            .cloned()
            .unwrap_or_else(|| format!("{name} 0.0.0-test\n"));
        let stderr = if code == 0 {
            String::new()
        } else {
            format!("error: {name} scripted to fail\n")
        };
        Ok(CommandOutput {
            code: Some(code),
            stdout,
            stderr,
        })
    }
}
