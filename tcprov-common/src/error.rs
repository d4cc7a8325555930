use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ProvisionError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Unsupported architecture '{0}' (supported: amd64, armhf, arm64, i386, ppc64el)")]
    UnsupportedArchitecture(String),

    #[error("DownloadError: Failed to download '{0}': {1}")]
    DownloadError(String, String),

    #[error("Checksum Mismatch for {subject}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        subject: String,
        expected: String,
        actual: String,
    },

    #[error("Installation Error: {0}")]
    InstallationFailure(String),

    #[error("Post-install verification failed: {0}")]
    PostInstallVerificationFailed(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Failed to execute command: {0}")]
    CommandExecError(String),
}

impl ProvisionError {
    /// Short, stable name of the failure class. Used in logs and the CLI summary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "Io",
            Self::Http(_) => "Http",
            Self::Json(_) => "Json",
            Self::Config(_) => "Config",
            Self::UnsupportedArchitecture(_) => "UnsupportedArchitecture",
            Self::DownloadError(..) => "DownloadError",
            Self::ChecksumMismatch { .. } => "ChecksumMismatch",
            Self::InstallationFailure(_) => "InstallationFailure",
            Self::PostInstallVerificationFailed(_) => "PostInstallVerificationFailed",
            Self::ValidationError(_) => "ValidationError",
            Self::CommandExecError(_) => "CommandExecError",
        }
    }
}

impl From<std::io::Error> for ProvisionError {
    fn from(err: std::io::Error) -> Self {
        ProvisionError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for ProvisionError {
    fn from(err: reqwest::Error) -> Self {
        ProvisionError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for ProvisionError {
    fn from(err: serde_json::Error) -> Self {
        ProvisionError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
