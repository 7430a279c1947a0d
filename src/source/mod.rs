//! Snapshot sources and the refresh cycle that feeds the [`IndexStore`].
//!
//! A [`SnapshotSource`] produces one decoded [`Snapshot`] per call, from a
//! local file or an HTTP endpoint. The [`Refresher`] turns each successful
//! load into a fresh index and swaps it into the store; failed loads are
//! logged and leave the previous index in service.
//!
//! [`IndexStore`]: crate::merchant::IndexStore

pub mod envelope;
pub mod error;
pub mod refresh;

pub use error::SourceError;
pub use refresh::{RefreshOutcome, RefreshStatus, Refresher};

use crate::config::{SourceConfig, SourceKind};
use crate::logutil::body_preview;
use crate::merchant::Snapshot;
use log::debug;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// HTTP endpoint serving the merchant page or its JSON payload.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    #[cfg(feature = "http")]
    timeout: Duration,
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

impl HttpSource {
    #[cfg(feature = "http")]
    pub fn new(url: &str, timeout: Duration, user_agent: &str) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            url: url.to_string(),
            timeout,
            client,
        })
    }

    #[cfg(not(feature = "http"))]
    pub fn new(url: &str, _timeout: Duration, _user_agent: &str) -> Result<Self, SourceError> {
        Ok(Self {
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[cfg(feature = "http")]
    async fn fetch_body(&self) -> Result<String, SourceError> {
        use tokio::time::timeout;

        debug!("Fetching merchant snapshot from: {}", self.url);
        let secs = self.timeout.as_secs();
        let response = timeout(self.timeout, self.client.get(&self.url).send())
            .await
            .map_err(|_| SourceError::Timeout(secs))??;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body = timeout(self.timeout, response.text())
            .await
            .map_err(|_| SourceError::Timeout(secs))??;
        Ok(body)
    }

    #[cfg(not(feature = "http"))]
    async fn fetch_body(&self) -> Result<String, SourceError> {
        Err(SourceError::HttpDisabled)
    }
}

#[derive(Debug, Clone)]
pub enum SnapshotSource {
    File(PathBuf),
    Http(HttpSource),
}

impl SnapshotSource {
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        match config.kind {
            SourceKind::File => Ok(SnapshotSource::File(PathBuf::from(&config.path))),
            SourceKind::Http => Ok(SnapshotSource::Http(HttpSource::new(
                &config.url,
                Duration::from_secs(u64::from(config.timeout_seconds.max(1))),
                &config.user_agent,
            )?)),
        }
    }

    /// Fetch and decode one snapshot.
    pub async fn load(&self) -> Result<Snapshot, SourceError> {
        let body = match self {
            SnapshotSource::File(path) => tokio::fs::read_to_string(path).await?,
            SnapshotSource::Http(http) => http.fetch_body().await?,
        };
        envelope::decode(&body).map_err(|e| {
            debug!("Undecodable snapshot from {}: {}", self, body_preview(&body));
            e
        })
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSource::File(path) => write!(f, "file {}", path.display()),
            SnapshotSource::Http(http) => write!(f, "{}", http.url()),
        }
    }
}
