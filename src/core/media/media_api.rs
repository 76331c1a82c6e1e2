use async_trait::async_trait;
use serde_json::Value;

use super::media_models::{LibrarySection, MediaError, SectionCounts};

/// The Plex calls the status reader needs.
///
/// Sessions stay as raw JSON so one malformed record cannot fail the batch;
/// each is normalized on its own by the formatter.
#[async_trait]
pub trait PlexApi: Send + Sync {
    /// Cheap request that proves the server is reachable and the token valid.
    async fn check_connection(&self) -> Result<(), MediaError>;
    async fn library_sections(&self) -> Result<Vec<LibrarySection>, MediaError>;
    /// Item count for a library, plus episode count when `with_episodes`.
    async fn section_counts(
        &self,
        section_key: &str,
        with_episodes: bool,
    ) -> Result<SectionCounts, MediaError>;
    async fn sessions(&self) -> Result<Vec<Value>, MediaError>;
}

/// The Jellyfin calls the status reader needs.
#[async_trait]
pub trait JellyfinApi: Send + Sync {
    async fn sessions(&self) -> Result<Vec<Value>, MediaError>;
}
