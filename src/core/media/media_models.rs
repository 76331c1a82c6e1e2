use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::config::{PlexSectionsConfig, SectionDisplay, DEFAULT_LIBRARY_EMOJI};

/// Errors raised while talking to either media server.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media server request failed: {0}")]
    Request(String),
    #[error("Media server returned HTTP {0}")]
    Status(u16),
    #[error("Failed to decode media server response: {0}")]
    Decode(String),
}

/// A library as listed by the Plex server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
}

/// Raw counts for one library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounts {
    pub items: u64,
    pub episodes: u64,
}

/// Display-ready statistics for one library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryStats {
    pub title: String,
    pub count: u64,
    pub episodes: u64,
    pub display_name: String,
    pub emoji: String,
    pub show_episodes: bool,
}

impl LibraryStats {
    pub fn configured(title: &str, counts: SectionCounts, display: &SectionDisplay) -> Self {
        Self {
            title: title.to_string(),
            count: counts.items,
            episodes: if display.show_episodes { counts.episodes } else { 0 },
            display_name: display.display_name.clone(),
            emoji: display.emoji.clone(),
            show_episodes: display.show_episodes,
        }
    }

    /// A library with no override: raw title, default glyph, no episode count.
    pub fn unconfigured(title: &str, items: u64) -> Self {
        Self {
            title: title.to_string(),
            count: items,
            episodes: 0,
            display_name: title.to_string(),
            emoji: DEFAULT_LIBRARY_EMOJI.to_string(),
            show_episodes: false,
        }
    }
}

/// Ordered per-library statistics. Order is the order the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarySnapshot {
    entries: Vec<LibraryStats>,
}

impl LibrarySnapshot {
    pub fn new(entries: Vec<LibraryStats>) -> Self {
        Self { entries }
    }

    /// Every configured library at zero, used while the server is unreachable.
    pub fn zeroed(config: &PlexSectionsConfig) -> Self {
        Self::new(
            config
                .sections
                .iter()
                .map(|(title, display)| {
                    LibraryStats::configured(title, SectionCounts::default(), display)
                })
                .collect(),
        )
    }

    pub fn get(&self, title: &str) -> Option<&LibraryStats> {
        self.entries.iter().find(|entry| entry.title == title)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LibraryStats> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether the primary server answered during this poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    Online { uptime: String },
    Offline { since: DateTime<Utc> },
}

/// Everything one poll learned about the media servers. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSnapshot {
    pub status: ServerStatus,
    pub libraries: LibrarySnapshot,
    /// Formatted stream blocks, primary server first.
    pub streams: Vec<String>,
    /// Sessions the primary server reported, before formatting.
    pub session_count: usize,
    /// How many of `streams` came from the secondary server.
    pub secondary_stream_count: usize,
}

impl ServerSnapshot {
    pub fn is_online(&self) -> bool {
        matches!(self.status, ServerStatus::Online { .. })
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }
}

/// Render a count with `.` as the thousands separator (`12345` -> `12.345`).
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
