// tcprov-common/src/lib.rs
pub mod arch;
pub mod config;
pub mod error;

// Re-export key types
pub use arch::{
    resolve_architecture_profile, ArchitectureProfile, HostArch, ARCHITECTURE_PROFILES,
    RUSTUP_VERSION,
};
pub use config::{Config, InstallRoots, ProvisioningRequest};
pub use error::{ProvisionError, Result};
