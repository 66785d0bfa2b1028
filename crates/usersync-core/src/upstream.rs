use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use usersync_types::upstream::UpstreamUser;

use crate::error::SyncError;

/// Seam to the third-party profile API. One fixed resource, no parameters.
/// Tests substitute a mock; production uses [`HttpUpstream`].
#[async_trait]
pub trait UpstreamFetch: Send + Sync {
    async fn fetch(&self) -> Result<UpstreamUser, SyncError>;
}

/// reqwest-backed fetcher for the fixed upstream URL.
pub struct HttpUpstream {
    client: reqwest::Client,
    url: String,
}

impl HttpUpstream {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl UpstreamFetch for HttpUpstream {
    async fn fetch(&self) -> Result<UpstreamUser, SyncError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SyncError::UpstreamUnavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::UpstreamUnavailable(format!(
                "upstream returned {status}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| SyncError::UpstreamUnavailable(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            warn!("upstream body did not parse: {}", e);
            SyncError::MalformedPayload(e.to_string())
        })
    }
}
