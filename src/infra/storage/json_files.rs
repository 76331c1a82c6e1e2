use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::fs;

use crate::core::config::{PlexBotConfig, UserAliases};
use crate::core::persistence::StoreError;

pub const CONFIG_FILE: &str = "config.json";
pub const USER_MAPPING_FILE: &str = "user_mapping.json";

/// Read and parse a JSON file. A missing file is `Ok(None)`.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_str(&text)?))
}

/// Like [`read_json`], but any failure is logged and replaced by the default.
pub async fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_json(path).await {
        Ok(Some(value)) => value,
        Ok(None) => {
            tracing::warn!(path = %path.display(), "File not found, using defaults");
            T::default()
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "Failed to load file, using defaults");
            T::default()
        }
    }
}

pub async fn load_config(data_dir: &Path) -> PlexBotConfig {
    let config: PlexBotConfig = load_or_default(&data_dir.join(CONFIG_FILE)).await;
    tracing::info!(
        sections = config.plex_sections.sections.iter().count(),
        show_all = config.plex_sections.show_all,
        "Loaded configuration"
    );
    config
}

pub async fn load_user_aliases(data_dir: &Path) -> UserAliases {
    let aliases: UserAliases = load_or_default(&data_dir.join(USER_MAPPING_FILE)).await;
    tracing::info!(count = aliases.len(), "Loaded user mapping");
    aliases
}
