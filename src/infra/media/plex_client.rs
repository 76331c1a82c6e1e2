use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::core::media::{LibrarySection, MediaError, PlexApi, SectionCounts};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Plex Media Server HTTP client. Only the endpoints the status reader needs.
pub struct PlexApiClient {
    client: Client,
    base_url: String,
}

impl PlexApiClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, MediaError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "X-Plex-Token",
            HeaderValue::from_str(token).map_err(|e| MediaError::Request(e.to_string()))?,
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

    async fn get(&self, path: &str) -> Result<Response, MediaError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MediaError::Status(resp.status().as_u16()));
        }
        Ok(resp)
    }

    async fn container<T: DeserializeOwned>(&self, path: &str) -> Result<T, MediaError> {
        let envelope: Envelope<T> = self
            .get(path)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::Decode(e.to_string()))?;
        Ok(envelope.media_container)
    }
}

#[async_trait]
impl PlexApi for PlexApiClient {
    async fn check_connection(&self) -> Result<(), MediaError> {
        self.get("/identity").await.map(|_| ())
    }

    async fn library_sections(&self) -> Result<Vec<LibrarySection>, MediaError> {
        let container: SectionsContainer = self.container("/library/sections").await?;
        Ok(container.into_sections())
    }

    async fn section_counts(
        &self,
        section_key: &str,
        with_episodes: bool,
    ) -> Result<SectionCounts, MediaError> {
        let container: ItemsContainer = self
            .container(&format!("/library/sections/{section_key}/all"))
            .await?;
        Ok(container.counts(with_episodes))
    }

    async fn sessions(&self) -> Result<Vec<Value>, MediaError> {
        let container: SessionsContainer = self.container("/status/sessions").await?;
        Ok(container.metadata)
    }
}

// Plex wraps every JSON response in a `MediaContainer` object.

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Default, Deserialize)]
struct SectionsContainer {
    #[serde(rename = "Directory", default)]
    directories: Vec<ApiDirectory>,
}

impl SectionsContainer {
    fn into_sections(self) -> Vec<LibrarySection> {
        self.directories
            .into_iter()
            .filter_map(|dir| {
                Some(LibrarySection {
                    key: dir.key?,
                    title: dir.title?,
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ApiDirectory {
    key: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ItemsContainer {
    size: Option<u64>,
    #[serde(rename = "Metadata", default)]
    metadata: Vec<ApiItem>,
}

impl ItemsContainer {
    fn counts(&self, with_episodes: bool) -> SectionCounts {
        SectionCounts {
            items: self.size.unwrap_or(self.metadata.len() as u64),
            episodes: if with_episodes {
                self.metadata.iter().filter_map(|item| item.leaf_count).sum()
            } else {
                0
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiItem {
    /// Episodes under a show.
    leaf_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionsContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<Value>,
}
