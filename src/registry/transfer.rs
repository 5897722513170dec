//! Authenticated HTTP transfer client
//!
//! A thin, registry-independent I/O primitive: bearer-token GET/PUT against
//! arbitrary URLs. Deliberately single-attempt; retries, if any, are the
//! caller's responsibility.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;

use crate::error::{FilesystemError, MigrationError, NetworkError};

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("pkgmig/", env!("CARGO_PKG_VERSION"));

/// HTTP transfer client
#[derive(Clone)]
pub struct TransferClient {
    client: Client,
}

impl TransferClient {
    /// Create a new transfer client with default settings
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new transfer client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                NetworkError::transport("", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Authenticated GET returning the raw response body
    ///
    /// Fails on any non-2xx status, carrying the response body as
    /// diagnostic context.
    pub async fn fetch_metadata(&self, url: &str, token: &str) -> Result<Vec<u8>, NetworkError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| NetworkError::transport(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::http_status(url, status.as_u16(), body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NetworkError::invalid_response(url, e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Authenticated GET writing the response body to a local file
    pub async fn download_artifact(
        &self,
        url: &str,
        destination: &Path,
        token: &str,
    ) -> Result<(), MigrationError> {
        let body = self.fetch_metadata(url, token).await?;
        tokio::fs::write(destination, body)
            .await
            .map_err(|e| FilesystemError::write(destination, e))?;
        Ok(())
    }

    /// Authenticated PUT of a local file's contents
    pub async fn upload_artifact(
        &self,
        url: &str,
        source: &Path,
        token: &str,
    ) -> Result<(), MigrationError> {
        let body = tokio::fs::read(source)
            .await
            .map_err(|e| FilesystemError::read(source, e))?;

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .body(body)
            .send()
            .await
            .map_err(|e| NetworkError::transport(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::http_status(url, status.as_u16(), body).into());
        }
        Ok(())
    }
}

impl Default for TransferClient {
    fn default() -> Self {
        Self::new().expect("failed to create default transfer client")
    }
}
