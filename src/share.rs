use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};

use crate::{
    error::{Result, SweepError},
    types::FileRecord,
};

/// File-listing provider boundary
///
/// Implementors give read-only access to the remote shared folder.
/// Connection and authentication failures surface as
/// `SweepError::ShareUnavailable`; a failure to read one file surfaces as
/// `SweepError::FileRead` so the sweep can continue with other documents.
#[async_trait]
pub trait FileLister: Send + Sync {
    /// List the entries of a folder on the share
    async fn list(&self, folder_path: &str) -> Result<Vec<FileRecord>>;

    /// Read a file's raw bytes by its share path
    async fn read(&self, path: &str) -> Result<Bytes>;

    /// Human-readable identifier for this provider (for logging)
    fn identifier(&self) -> String;
}

/// Share gateway-backed listing provider
///
/// Talks to the REST gateway fronting the shared folder:
/// - `GET <base>/shares/<share>/list?path=...` returns the listing as JSON
/// - `GET <base>/shares/<share>/file?path=...` returns raw file bytes
///
/// Credentials travel as HTTP basic auth.
#[derive(Clone)]
pub struct GatewayLister {
    client: Client,
    base_url: String,
    share: String,
    username: String,
    password: String,
}

impl GatewayLister {
    pub fn new(base_url: String, share: String, username: String, password: String) -> Self {
        let client = Client::builder()
            .user_agent("certsweep/0.2")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            share,
            username,
            password,
        }
    }

    fn list_url(&self) -> String {
        format!(
            "{}/shares/{}/list",
            self.base_url.trim_end_matches('/'),
            self.share
        )
    }

    fn file_url(&self) -> String {
        format!(
            "{}/shares/{}/file",
            self.base_url.trim_end_matches('/'),
            self.share
        )
    }

    /// Normalize a folder path to the form the gateway expects
    fn normalize_path(path: &str) -> String {
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        }
    }
}

#[async_trait]
impl FileLister for GatewayLister {
    async fn list(&self, folder_path: &str) -> Result<Vec<FileRecord>> {
        let path = Self::normalize_path(folder_path);

        let response = self
            .client
            .get(self.list_url())
            .basic_auth(&self.username, Some(&self.password))
            .query(&[("path", path.as_str())])
            .send()
            .await
            .map_err(|e| SweepError::ShareUnavailable {
                message: e.to_string(),
            })?;

        match response.status() {
            StatusCode::OK => {
                let records: Vec<FileRecord> =
                    response
                        .json()
                        .await
                        .map_err(|e| SweepError::ShareUnavailable {
                            message: format!("invalid listing response: {}", e),
                        })?;
                Ok(records)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SweepError::ShareUnavailable {
                    message: format!("listing {} failed with status {}: {}", path, status, body),
                })
            }
        }
    }

    async fn read(&self, path: &str) -> Result<Bytes> {
        let normalized = Self::normalize_path(path);

        let response = self
            .client
            .get(self.file_url())
            .basic_auth(&self.username, Some(&self.password))
            .query(&[("path", normalized.as_str())])
            .send()
            .await
            .map_err(|e| SweepError::FileRead {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        match response.status() {
            StatusCode::OK => response.bytes().await.map_err(|e| SweepError::FileRead {
                path: path.to_string(),
                message: e.to_string(),
            }),
            status => Err(SweepError::FileRead {
                path: path.to_string(),
                message: format!("status {}", status),
            }),
        }
    }

    fn identifier(&self) -> String {
        format!("gateway://{}/{}", self.base_url, self.share)
    }
}
