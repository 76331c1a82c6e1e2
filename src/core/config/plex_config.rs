use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Glyph used for libraries that have no configured display override.
pub const DEFAULT_LIBRARY_EMOJI: &str = "🎬";

/// Top-level bot configuration, read from `config.json`.
///
/// Every level carries `#[serde(default)]`, so a partial file only overrides
/// the keys it actually contains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlexBotConfig {
    pub dashboard: DashboardConfig,
    pub plex_sections: PlexSectionsConfig,
    pub presence: PresenceConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub name: String,
    pub icon_url: String,
    pub footer_icon_url: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            name: "Plex Dashboard".to_string(),
            icon_url: String::new(),
            footer_icon_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlexSectionsConfig {
    /// Append libraries that have no override after the configured ones.
    pub show_all: bool,
    pub sections: SectionOverrides,
}

impl Default for PlexSectionsConfig {
    fn default() -> Self {
        Self {
            show_all: true,
            sections: SectionOverrides::default(),
        }
    }
}

/// Display override for one Plex library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDisplay {
    /// Falls back to the library title when left out.
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_library_emoji")]
    pub emoji: String,
    #[serde(default)]
    pub show_episodes: bool,
}

fn default_library_emoji() -> String {
    DEFAULT_LIBRARY_EMOJI.to_string()
}

/// Library title -> display override, in the order the file lists them.
///
/// A plain `HashMap` would lose the ordering, and the dashboard renders the
/// libraries in exactly this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionOverrides(Vec<(String, SectionDisplay)>);

impl SectionOverrides {
    pub fn new(entries: Vec<(String, SectionDisplay)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, title: &str) -> Option<&SectionDisplay> {
        self.0
            .iter()
            .find(|(key, _)| key == title)
            .map(|(_, display)| display)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SectionDisplay)> {
        self.0.iter().map(|(title, display)| (title.as_str(), display))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SectionOverrides {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (title, display) in &self.0 {
            map.serialize_entry(title, display)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionOverrides {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = SectionOverrides;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of library titles to display settings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, SectionDisplay)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((title, mut display)) =
                    access.next_entry::<String, SectionDisplay>()?
                {
                    if display.display_name.trim().is_empty() {
                        display.display_name = title.clone();
                    }
                    // Later duplicates win, like they would in a map.
                    entries.retain(|(existing, _)| existing != &title);
                    entries.push((title, display));
                }
                Ok(SectionOverrides(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// One library shown in the idle presence text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceSection {
    pub section_title: String,
    pub display_name: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub sections: Vec<PresenceSection>,
    pub offline_text: String,
    /// Supports `{count}` and `{s}` placeholders.
    pub stream_text: String,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            offline_text: "🔴 Server Offline!".to_string(),
            stream_text: "{count} active Stream{s} 🟢".to_string(),
        }
    }
}

impl PresenceConfig {
    /// Fill the stream template for `count` active streams.
    pub fn stream_text_for(&self, count: usize) -> String {
        let plural = if count == 1 { "" } else { "s" };
        self.stream_text
            .replace("{count}", &count.to_string())
            .replace("{s}", plural)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds between library stat refreshes. Fractions are allowed.
    pub library_update_interval: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            library_update_interval: 900.0,
        }
    }
}

impl CacheConfig {
    /// Negative or NaN intervals mean "always refresh"; huge ones saturate.
    pub fn interval(&self) -> chrono::Duration {
        // `as` saturates at the i64 bounds and maps NaN to 0.
        let millis = (self.library_update_interval * 1000.0).round().max(0.0) as i64;
        chrono::Duration::try_milliseconds(millis).unwrap_or(chrono::Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: PlexBotConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PlexBotConfig::default());
        assert_eq!(config.dashboard.name, "Plex Dashboard");
        assert!(config.plex_sections.show_all);
        assert_eq!(config.cache.library_update_interval, 900.0);
        assert_eq!(config.cache.interval(), chrono::Duration::seconds(900));
    }

    #[test]
    fn partial_sections_override_only_their_keys() {
        let raw = r#"{
            "presence": { "offline_text": "down" },
            "cache": { "library_update_interval": 60 }
        }"#;
        let config: PlexBotConfig = serde_json::from_str(raw).unwrap();

        assert_eq!(config.presence.offline_text, "down");
        assert_eq!(config.presence.stream_text, "{count} active Stream{s} 🟢");
        assert_eq!(config.cache.interval(), chrono::Duration::seconds(60));
        assert_eq!(config.dashboard, DashboardConfig::default());
    }

    #[test]
    fn section_overrides_keep_file_order() {
        let raw = r#"{
            "plex_sections": {
                "show_all": false,
                "sections": {
                    "TV Shows": { "display_name": "Series", "emoji": "📺", "show_episodes": true },
                    "Anime": { "display_name": "Anime", "emoji": "🍥" },
                    "Movies": { "display_name": "Films", "emoji": "🎥" }
                }
            }
        }"#;
        let config: PlexBotConfig = serde_json::from_str(raw).unwrap();
        let titles: Vec<&str> = config.plex_sections.sections.iter().map(|(t, _)| t).collect();

        assert!(!config.plex_sections.show_all);
        assert_eq!(titles, vec!["TV Shows", "Anime", "Movies"]);
        assert!(config.plex_sections.sections.get("TV Shows").unwrap().show_episodes);
        assert!(!config.plex_sections.sections.get("Anime").unwrap().show_episodes);
    }

    #[test]
    fn section_overrides_serialize_back_in_order() {
        let overrides = SectionOverrides::new(vec![
            (
                "B".to_string(),
                SectionDisplay {
                    display_name: "Bee".to_string(),
                    emoji: "🐝".to_string(),
                    show_episodes: false,
                },
            ),
            (
                "A".to_string(),
                SectionDisplay {
                    display_name: "Ay".to_string(),
                    emoji: "🅰️".to_string(),
                    show_episodes: true,
                },
            ),
        ]);
        let text = serde_json::to_string(&overrides).unwrap();
        assert!(text.find("\"B\"").unwrap() < text.find("\"A\"").unwrap());
    }

    #[test]
    fn float_interval_keeps_the_rest_of_the_file() {
        let raw = r#"{
            "dashboard": { "name": "Mine" },
            "presence": { "stream_text": "{count} watching" },
            "cache": { "library_update_interval": 600.0 }
        }"#;
        let config: PlexBotConfig = serde_json::from_str(raw).unwrap();

        assert_eq!(config.dashboard.name, "Mine");
        assert_eq!(config.presence.stream_text, "{count} watching");
        assert_eq!(config.cache.interval(), chrono::Duration::seconds(600));
    }

    #[test]
    fn fractional_interval_keeps_milliseconds() {
        let cache = CacheConfig {
            library_update_interval: 1.5,
        };
        assert_eq!(cache.interval(), chrono::Duration::milliseconds(1500));
    }

    #[test]
    fn out_of_range_intervals_do_not_panic() {
        let huge = CacheConfig {
            library_update_interval: 100_000_000_000_000_000.0,
        };
        assert_eq!(huge.interval(), chrono::Duration::MAX);

        let negative = CacheConfig {
            library_update_interval: -30.0,
        };
        assert_eq!(negative.interval(), chrono::Duration::zero());

        let nan = CacheConfig {
            library_update_interval: f64::NAN,
        };
        assert_eq!(nan.interval(), chrono::Duration::zero());
    }

    #[test]
    fn huge_integer_interval_from_file_does_not_panic() {
        let raw = r#"{ "cache": { "library_update_interval": 100000000000000000 } }"#;
        let config: PlexBotConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.cache.interval(), chrono::Duration::MAX);
    }

    #[test]
    fn section_without_display_name_uses_its_title() {
        let raw = r#"{
            "dashboard": { "name": "Mine" },
            "plex_sections": {
                "sections": {
                    "Movies": { "emoji": "🎥" },
                    "TV Shows": { "display_name": "Series" }
                }
            }
        }"#;
        let config: PlexBotConfig = serde_json::from_str(raw).unwrap();
        let sections = &config.plex_sections.sections;

        assert_eq!(config.dashboard.name, "Mine");
        assert_eq!(sections.get("Movies").unwrap().display_name, "Movies");
        assert_eq!(sections.get("Movies").unwrap().emoji, "🎥");
        assert_eq!(sections.get("TV Shows").unwrap().display_name, "Series");
        assert_eq!(sections.get("TV Shows").unwrap().emoji, DEFAULT_LIBRARY_EMOJI);
    }

    #[test]
    fn stream_text_pluralizes() {
        let presence = PresenceConfig::default();
        assert_eq!(presence.stream_text_for(1), "1 active Stream 🟢");
        assert_eq!(presence.stream_text_for(3), "3 active Streams 🟢");
    }
}
