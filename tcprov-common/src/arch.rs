// tcprov-common/src/arch.rs
//! Host architectures and the pinned rustup-init artifacts built for them.
//!
//! The architecture identifier is the string the OS package subsystem reports
//! (`dpkg --print-architecture`), so the installer variant always agrees with
//! how the surrounding package manager classifies the host.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ProvisionError, Result};

/// Version of the rustup installer whose artifacts the checksums below describe.
///
/// Pinned separately from the toolchain version: the toolchain is a free
/// parameter, the installer and its digests are not.
pub const RUSTUP_VERSION: &str = "1.27.1";

/// File name of the installer inside every per-triple archive directory.
pub const INSTALLER_FILE_NAME: &str = "rustup-init";

/// Host architectures with a known rustup-init artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostArch {
    Amd64,
    Armhf,
    Arm64,
    I386,
    Ppc64el,
}

impl HostArch {
    pub const ALL: [HostArch; 5] = [
        HostArch::Amd64,
        HostArch::Armhf,
        HostArch::Arm64,
        HostArch::I386,
        HostArch::Ppc64el,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostArch::Amd64 => "amd64",
            HostArch::Armhf => "armhf",
            HostArch::Arm64 => "arm64",
            HostArch::I386 => "i386",
            HostArch::Ppc64el => "ppc64el",
        }
    }

    /// The pinned installer profile for this architecture.
    pub fn profile(&self) -> &'static ArchitectureProfile {
        match self {
            HostArch::Amd64 => &ARCHITECTURE_PROFILES[0],
            HostArch::Armhf => &ARCHITECTURE_PROFILES[1],
            HostArch::Arm64 => &ARCHITECTURE_PROFILES[2],
            HostArch::I386 => &ARCHITECTURE_PROFILES[3],
            HostArch::Ppc64el => &ARCHITECTURE_PROFILES[4],
        }
    }
}

impl fmt::Display for HostArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostArch {
    type Err = ProvisionError;

    /// Exact match only. `dpkg` output is lowercase and we do not guess.
    fn from_str(s: &str) -> Result<Self> {
        HostArch::ALL
            .into_iter()
            .find(|arch| arch.as_str() == s)
            .ok_or_else(|| ProvisionError::UnsupportedArchitecture(s.to_string()))
    }
}

/// Installer variant and expected SHA-256 for one host architecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchitectureProfile {
    pub arch: HostArch,
    pub target_triple: &'static str,
    pub sha256: &'static str,
}

/// rustup-init 1.27.1 digests, one per supported architecture.
pub static ARCHITECTURE_PROFILES: [ArchitectureProfile; 5] = [
    ArchitectureProfile {
        arch: HostArch::Amd64,
        target_triple: "x86_64-unknown-linux-gnu",
        sha256: "6aeece6993e902708983b209d04c0d1dbb14ebb405ddb87def578d41f920f56d",
    },
    ArchitectureProfile {
        arch: HostArch::Armhf,
        target_triple: "armv7-unknown-linux-gnueabihf",
        sha256: "3c4114923305f1cd3b96ce3454e9e549ad4aa7c07c03aec73d1a785e98388bed",
    },
    ArchitectureProfile {
        arch: HostArch::Arm64,
        target_triple: "aarch64-unknown-linux-gnu",
        sha256: "1cffbf51e63e634c746f741de50649bbbcbd9dbe1de363c9ecef64e278dba2b2",
    },
    ArchitectureProfile {
        arch: HostArch::I386,
        target_triple: "i686-unknown-linux-gnu",
        sha256: "0a6bed6e9f21192a51f83977716466895706059afb880500ff1d0e751ada5237",
    },
    ArchitectureProfile {
        arch: HostArch::Ppc64el,
        target_triple: "powerpc64le-unknown-linux-gnu",
        sha256: "079430f58ad4da1d1f4f5f2f0bd321422373213246a93b3ddb53dad627f5aa38",
    },
];

/// Looks up the pinned profile for an OS-reported architecture string.
pub fn resolve_architecture_profile(host_arch: &str) -> Result<&'static ArchitectureProfile> {
    resolve_in(&ARCHITECTURE_PROFILES, host_arch)
}

/// Same lookup against an arbitrary table. The pipeline is built on this so
/// it can be driven with fixture digests.
pub fn resolve_in<'a>(
    table: &'a [ArchitectureProfile],
    host_arch: &str,
) -> Result<&'a ArchitectureProfile> {
    let trimmed = host_arch.trim();
    table
        .iter()
        .find(|profile| profile.arch.as_str() == trimmed)
        .ok_or_else(|| ProvisionError::UnsupportedArchitecture(trimmed.to_string()))
}
