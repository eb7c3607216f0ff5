//! Download utilities
//!
//! Streams a remote archive to disk without holding the body in memory.

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Errors raised while fetching a remote resource
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the response body is pulled off the connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Pull the body one chunk at a time until it is exhausted
    Whole,
    /// Consume the body as a byte stream
    #[default]
    Streamed,
}

/// HTTP fetcher for release archives
pub struct Fetcher {
    client: reqwest::Client,
    mode: FetchMode,
}

impl Fetcher {
    pub fn new(user_agent: &str, mode: FetchMode) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client, mode })
    }

    /// Download `url` to `destination`, returning the number of bytes written.
    ///
    /// The body is written to `<destination>.part` and only renamed into place
    /// once the transfer completes, so `destination` never holds a truncated file.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64, FetchError> {
        tracing::info!("Downloading {} to {:?}", url, destination);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }
        tracing::debug!("Download size: {:?} bytes", response.content_length());

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let part = part_path(destination);
        let written = match self.write_body(response, &part).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&part).await;
                return Err(e);
            }
        };

        tokio::fs::rename(&part, destination).await?;
        tracing::info!("Downloaded {} bytes from {}", written, url);
        Ok(written)
    }

    async fn write_body(
        &self,
        mut response: reqwest::Response,
        part: &Path,
    ) -> Result<u64, FetchError> {
        let mut file = tokio::fs::File::create(part).await?;
        let mut written: u64 = 0;

        match self.mode {
            FetchMode::Whole => {
                while let Some(chunk) = response.chunk().await? {
                    file.write_all(&chunk).await?;
                    written += chunk.len() as u64;
                }
            }
            FetchMode::Streamed => {
                let mut stream = response.bytes_stream();
                while let Some(chunk) = stream.next().await {
                    let chunk = chunk?;
                    file.write_all(&chunk).await?;
                    written += chunk.len() as u64;
                }
            }
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}

fn part_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());
    destination.with_file_name(format!("{}.part", name))
}
