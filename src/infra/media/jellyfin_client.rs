use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;

use super::plex_client::REQUEST_TIMEOUT;
use crate::core::media::{JellyfinApi, MediaError};

/// Jellyfin HTTP client; the only call is the session list.
pub struct JellyfinApiClient {
    client: Client,
    base_url: String,
}

impl JellyfinApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, MediaError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "X-Emby-Token",
            HeaderValue::from_str(api_key).map_err(|e| MediaError::Request(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MediaError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl JellyfinApi for JellyfinApiClient {
    async fn sessions(&self) -> Result<Vec<Value>, MediaError> {
        let resp = self
            .client
            .get(format!("{}/Sessions", self.base_url))
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MediaError::Status(resp.status().as_u16()));
        }

        resp.json()
            .await
            .map_err(|e| MediaError::Decode(e.to_string()))
    }
}
