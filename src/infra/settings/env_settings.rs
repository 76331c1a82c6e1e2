use std::path::PathBuf;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),
    #[error("{name} must be a numeric id, got {value:?}")]
    InvalidId { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JellyfinSettings {
    pub url: String,
    pub api_key: String,
}

/// Startup settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    pub discord_token: String,
    pub plex_url: String,
    pub plex_token: String,
    pub channel_id: u64,
    /// Present only when both the URL and API key are set.
    pub jellyfin: Option<JellyfinSettings>,
    pub data_dir: PathBuf,
}

impl BotSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &'static str| value(name).ok_or(SettingsError::Missing(name));

        let channel_raw = required("CHANNEL_ID")?;
        let channel_id = channel_raw
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| SettingsError::InvalidId {
                name: "CHANNEL_ID",
                value: channel_raw.clone(),
            })?;

        let jellyfin = match (value("JELLYFIN_URL"), value("JELLYFIN_API_KEY")) {
            (Some(url), Some(api_key)) => Some(JellyfinSettings {
                url: url.trim_end_matches('/').to_string(),
                api_key,
            }),
            _ => None,
        };

        Ok(Self {
            discord_token: required("DISCORD_TOKEN")?,
            plex_url: required("PLEX_URL")?,
            plex_token: required("PLEX_TOKEN")?,
            channel_id,
            jellyfin,
            data_dir: value("PLEXWATCH_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
        })
    }
}

/// Containers get their environment injected; `.env` is for local runs.
pub fn running_in_docker() -> bool {
    std::env::var("RUNNING_IN_DOCKER")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("DISCORD_TOKEN", "discord"),
        ("PLEX_URL", "http://plex:32400"),
        ("PLEX_TOKEN", "plex"),
        ("CHANNEL_ID", "123456789012345678"),
    ];

    #[test]
    fn required_values_only() {
        let settings = BotSettings::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(settings.channel_id, 123456789012345678);
        assert_eq!(settings.jellyfin, None);
        assert_eq!(settings.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn missing_token_is_reported_by_name() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "PLEX_TOKEN")
            .collect();
        assert_eq!(
            BotSettings::from_lookup(lookup(&pairs)),
            Err(SettingsError::Missing("PLEX_TOKEN"))
        );
    }

    #[test]
    fn channel_id_must_be_numeric() {
        let mut pairs = REQUIRED.to_vec();
        for bad in ["dashboard", "0", "-5"] {
            pairs[3] = ("CHANNEL_ID", bad);
            assert!(matches!(
                BotSettings::from_lookup(lookup(&pairs)),
                Err(SettingsError::InvalidId { .. })
            ));
        }
    }

    #[test]
    fn jellyfin_needs_url_and_key() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("JELLYFIN_URL", "http://jellyfin:8096/"));
        let settings = BotSettings::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(settings.jellyfin, None);

        pairs.push(("JELLYFIN_API_KEY", "key"));
        pairs.push(("PLEXWATCH_DATA_DIR", "/srv/plexwatch"));
        let settings = BotSettings::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(
            settings.jellyfin,
            Some(JellyfinSettings {
                url: "http://jellyfin:8096".to_string(),
                api_key: "key".to_string(),
            })
        );
        assert_eq!(settings.data_dir, PathBuf::from("/srv/plexwatch"));
    }
}
