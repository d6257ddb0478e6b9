//! Firebase Storage lookups over the REST API.
//!
//! A `gs://<bucket>/<path>` reference resolves to a tokenised download URL:
//! the object metadata at `{endpoint}/b/<bucket>/o/<path>` carries a
//! comma-separated `downloadTokens` field, and the media URL is the same
//! object URL with `alt=media&token=<first token>`.

use crate::config::StorageServiceConfig;
use crate::error::{ResolverError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;
use vizion_core::RemoteStorageService;

const GS_SCHEME: &str = "gs://";

/// A parsed `gs://bucket/path` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageReference {
    pub bucket: String,
    pub path: String,
}

impl StorageReference {
    /// Parse a `gs://bucket/path` identifier
    pub fn parse(identifier: &str) -> Result<Self> {
        let rest = identifier
            .strip_prefix(GS_SCHEME)
            .ok_or_else(|| ResolverError::InvalidReference(identifier.to_string()))?;

        match rest.split_once('/') {
            Some((bucket, path)) if !bucket.is_empty() && !path.is_empty() => Ok(Self {
                bucket: bucket.to_string(),
                path: path.to_string(),
            }),
            _ => Err(ResolverError::InvalidReference(identifier.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    #[serde(default)]
    download_tokens: Option<String>,
}

/// [`RemoteStorageService`] backed by the Firebase Storage REST API
pub struct FirebaseStorageService {
    http: Client,
    endpoint: Url,
}

impl FirebaseStorageService {
    /// Create a service for the configured endpoint.
    pub fn new(config: StorageServiceConfig) -> Result<Self> {
        let trimmed = config.endpoint.trim_end_matches('/');
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(ResolverError::InvalidUrl(
                "Endpoint must start with http:// or https://".into(),
            ));
        }

        let endpoint =
            Url::parse(trimmed).map_err(|e| ResolverError::InvalidUrl(e.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(ResolverError::InvalidUrl(trimmed.to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Vizion/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, endpoint })
    }

    /// Object URL for a reference; the path is encoded as a single segment
    pub fn object_url(&self, reference: &StorageReference) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| ResolverError::InvalidUrl(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend(["b", reference.bucket.as_str(), "o", reference.path.as_str()]);
        Ok(url)
    }

    /// Fetch the object metadata and build its download URL
    pub async fn download_url(&self, identifier: &str) -> Result<String> {
        let reference = StorageReference::parse(identifier)?;
        let object_url = self.object_url(&reference)?;

        debug!(url = %object_url, identifier = %identifier, "Fetching object metadata");

        let response = self.http.get(object_url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ResolverError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let metadata: ObjectMetadata = response.json().await.map_err(|e| {
            ResolverError::ParseError(format!("Failed to parse object metadata: {}", e))
        })?;

        let token = metadata
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').map(str::trim).find(|t| !t.is_empty()))
            .ok_or_else(|| ResolverError::MissingToken(identifier.to_string()))?;

        let mut media_url = object_url;
        media_url
            .query_pairs_mut()
            .append_pair("alt", "media")
            .append_pair("token", token);

        Ok(media_url.into())
    }
}

#[async_trait]
impl RemoteStorageService for FirebaseStorageService {
    async fn resolve(&self, identifier: &str) -> vizion_core::Result<String> {
        Ok(self.download_url(identifier).await?)
    }
}
