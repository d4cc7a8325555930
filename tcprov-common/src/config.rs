// tcprov-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{ProvisionError, Result};

const DEFAULT_RUSTUP_HOME: &str = "/usr/local/rustup";
const DEFAULT_CARGO_HOME: &str = "/usr/local/cargo";
const DEFAULT_TOOLCHAIN_VERSION: &str = "1.79.0";
const DEFAULT_DIST_SERVER: &str = "https://static.rust-lang.org";

#[derive(Debug, Clone)]
pub struct Config {
    pub rustup_home: PathBuf,
    pub cargo_home: PathBuf,
    pub toolchain_version: String,
    pub dist_server: String,
    pub tmp_dir: PathBuf,
    pub host_arch_override: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Loading tcprov configuration");
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rustup_home = PathBuf::from(get("RUSTUP_HOME").unwrap_or_else(|| {
            debug!("RUSTUP_HOME not set, falling back to {}", DEFAULT_RUSTUP_HOME);
            DEFAULT_RUSTUP_HOME.to_string()
        }));
        let cargo_home = PathBuf::from(get("CARGO_HOME").unwrap_or_else(|| {
            debug!("CARGO_HOME not set, falling back to {}", DEFAULT_CARGO_HOME);
            DEFAULT_CARGO_HOME.to_string()
        }));
        let toolchain_version =
            get("RUST_VERSION").unwrap_or_else(|| DEFAULT_TOOLCHAIN_VERSION.to_string());
        let dist_server = get("TCPROV_DIST_SERVER")
            .unwrap_or_else(|| DEFAULT_DIST_SERVER.to_string())
            .trim_end_matches('/')
            .to_string();
        let tmp_dir = get("TCPROV_TMPDIR")
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);
        let host_arch_override = get("TCPROV_HOST_ARCH");

        let config = Self {
            rustup_home,
            cargo_home,
            toolchain_version,
            dist_server,
            tmp_dir,
            host_arch_override,
        };
        config.validate()?;
        debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Replaces the toolchain version, e.g. from a command-line flag.
    pub fn with_toolchain_version(mut self, version: impl Into<String>) -> Result<Self> {
        self.toolchain_version = version.into();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("RUSTUP_HOME", &self.rustup_home),
            ("CARGO_HOME", &self.cargo_home),
        ] {
            if !path.is_absolute() {
                return Err(ProvisionError::Config(format!(
                    "{name} must be an absolute path, got '{}'",
                    path.display()
                )));
            }
        }
        if self.rustup_home == self.cargo_home {
            return Err(ProvisionError::Config(format!(
                "RUSTUP_HOME and CARGO_HOME must differ (both are '{}')",
                self.rustup_home.display()
            )));
        }
        if self.toolchain_version.is_empty()
            || self.toolchain_version.chars().any(char::is_whitespace)
        {
            return Err(ProvisionError::Config(format!(
                "RUST_VERSION must be a single toolchain name, got '{}'",
                self.toolchain_version
            )));
        }
        Ok(())
    }

    pub fn install_roots(&self) -> InstallRoots {
        InstallRoots {
            home: self.rustup_home.clone(),
            bin: self.cargo_home.clone(),
        }
    }

    pub fn cargo_bin_dir(&self) -> PathBuf {
        self.cargo_home.join("bin")
    }
}

/// The two directories the toolchain is installed into.
///
/// `home` holds the rustup runtime (`RUSTUP_HOME`), `bin` holds cargo and its
/// `bin/` search-path entry (`CARGO_HOME`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRoots {
    pub home: PathBuf,
    pub bin: PathBuf,
}

impl InstallRoots {
    pub fn bin_dir(&self) -> PathBuf {
        self.bin.join("bin")
    }

    pub fn tool_path(&self, tool: &str) -> PathBuf {
        self.bin_dir().join(tool)
    }

    pub fn as_array(&self) -> [&Path; 2] {
        [&self.home, &self.bin]
    }

    /// Environment every toolchain process is run with.
    pub fn envs(&self) -> Vec<(String, String)> {
        let path = match env::var("PATH") {
            Ok(existing) if !existing.is_empty() => {
                format!("{}:{existing}", self.bin_dir().display())
            }
            _ => self.bin_dir().display().to_string(),
        };
        vec![
            ("RUSTUP_HOME".to_string(), self.home.display().to_string()),
            ("CARGO_HOME".to_string(), self.bin.display().to_string()),
            ("PATH".to_string(), path),
        ]
    }
}

/// Inputs of one provisioning run. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct ProvisioningRequest {
    pub host_arch: String,
    pub toolchain_version: String,
    pub roots: InstallRoots,
}

impl ProvisioningRequest {
    pub fn new(config: &Config, host_arch: impl Into<String>) -> Self {
        Self {
            host_arch: host_arch.into(),
            toolchain_version: config.toolchain_version.clone(),
            roots: config.install_roots(),
        }
    }
}
