//! HTTP-backed image source.

use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use vizion_core::{ImageSource, VizionError};

/// Fetches cover art over HTTP(S)
pub struct HttpImageSource {
    http: Client,
}

impl HttpImageSource {
    /// Create a source with default timeouts
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a source with a request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Vizion/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> vizion_core::Result<Vec<u8>> {
        debug!(url = %url, "Fetching cover art");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| VizionError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VizionError::network(format!(
                "Image request failed ({}): {}",
                status.as_u16(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VizionError::network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
