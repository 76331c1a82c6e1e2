use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::json_files::read_json;
use crate::core::persistence::{MessageIdStore, StoreError};

pub const MESSAGE_ID_FILE: &str = "dashboard_message_id.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredMessageId {
    message_id: u64,
}

/// Keeps the dashboard message id in a small JSON file.
pub struct JsonMessageIdStore {
    path: PathBuf,
}

impl JsonMessageIdStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(MESSAGE_ID_FILE))
    }
}

#[async_trait]
impl MessageIdStore for JsonMessageIdStore {
    async fn load(&self) -> Result<Option<u64>, StoreError> {
        let stored: Option<StoredMessageId> = read_json(&self.path).await?;
        Ok(stored.map(|s| s.message_id))
    }

    async fn save(&self, message_id: u64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let text = serde_json::to_string(&StoredMessageId { message_id })?;
        fs::write(&self.path, text).await?;
        Ok(())
    }
}
