// tcprov-net/src/lib.rs
pub mod http;
pub mod validation;

pub use http::{fetch_installer, installer_url, HttpInstallerSource, InstallerSource};
pub use validation::{sha256_hex, validate_url, verify_checksum, verify_integrity};
