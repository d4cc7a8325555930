// tcprov-net/src/http.rs
use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use tcprov_common::arch::{ArchitectureProfile, INSTALLER_FILE_NAME, RUSTUP_VERSION};
use tcprov_common::error::{ProvisionError, Result};
use tracing::{debug, error};

use crate::validation::validate_url;

const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = "tcprov toolchain provisioner (Rust)";

/// Where installer bytes come from.
pub trait InstallerSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>>;
}

/// Pinned, immutable artifact location of rustup-init for one profile.
pub fn installer_url(base_url: &str, profile: &ArchitectureProfile) -> String {
    format!(
        "{}/rustup/archive/{}/{}/{}",
        base_url.trim_end_matches('/'),
        RUSTUP_VERSION,
        profile.target_triple,
        INSTALLER_FILE_NAME
    )
}

/// Downloads the installer for `profile`. Single attempt, no mirrors.
pub async fn fetch_installer<S: InstallerSource>(
    source: &S,
    profile: &ArchitectureProfile,
    base_url: &str,
) -> Result<Vec<u8>> {
    let url = installer_url(base_url, profile);
    validate_url(&url)?;
    debug!(
        "Fetching rustup-init {} for {} from {}",
        RUSTUP_VERSION, profile.arch, url
    );
    source.fetch(&url).await
}

pub fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    let client = Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .https_only(true)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;
    Ok(client)
}

/// Any non-2xx response is a failed download. Redirects are followed by the client.
pub fn check_status(url: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    error!("HTTP error {} for URL {}", status, url);
    Err(ProvisionError::DownloadError(
        url.to_string(),
        format!("server responded with HTTP {status}"),
    ))
}

/// reqwest-backed [`InstallerSource`].
#[derive(Debug, Clone)]
pub struct HttpInstallerSource {
    client: Client,
}

impl HttpInstallerSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
        })
    }
}

impl InstallerSource for HttpInstallerSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            error!("HTTP request failed for {url}: {e}");
            ProvisionError::DownloadError(url.to_string(), format!("HTTP request failed: {e}"))
        })?;
        let status = response.status();
        debug!("Received HTTP status: {} for {}", status, url);

        check_status(url, status)?;

        let content = response.bytes().await.map_err(|e| {
            ProvisionError::DownloadError(
                url.to_string(),
                format!("Failed to read response body bytes: {e}"),
            )
        })?;
        debug!("Downloaded {} bytes from {}", content.len(), url);
        Ok(content.to_vec())
    }
}
