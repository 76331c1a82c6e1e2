use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Remembers which Discord message the dashboard lives in.
#[async_trait]
pub trait MessageIdStore: Send + Sync {
    async fn load(&self) -> Result<Option<u64>, StoreError>;
    async fn save(&self, message_id: u64) -> Result<(), StoreError>;
}
