use chrono::{DateTime, Utc};

use crate::core::media::ServerSnapshot;

/// Zero-width space; Discord rejects empty field names and values.
pub const BLANK: &str = "\u{200b}";

/// Discord's limit for a single embed field value.
pub const FIELD_VALUE_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }

    /// A value wrapped in a code block.
    pub fn code(name: impl Into<String>, value: impl AsRef<str>, inline: bool) -> Self {
        Self::new(name, format!("```{}```", value.as_ref()), inline)
    }

    pub fn spacer() -> Self {
        Self::new(BLANK, BLANK, true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTone {
    Online,
    Offline,
}

/// Platform-agnostic description of the dashboard embed.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub tone: DashboardTone,
    pub author_name: String,
    /// Author icon and thumbnail.
    pub icon_url: Option<String>,
    pub footer_text: String,
    pub footer_icon_url: Option<String>,
    pub fields: Vec<EmbedField>,
    pub timestamp: DateTime<Utc>,
}

/// Download queue as it will be rendered: at most four formatted lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadsSection {
    pub lines: Vec<String>,
    /// Size of the whole queue, not just the rendered lines.
    pub total_count: usize,
    pub total_size: String,
    pub free_space: String,
    pub total_space: String,
}

/// Pre-formatted uptime windows, `"No data"` where a window is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UptimeSummary {
    pub day: String,
    pub week: String,
    pub month: String,
    /// The 24h window has data; the uptime fields are hidden otherwise.
    pub has_recent_data: bool,
}

/// Everything one dashboard render needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub server: ServerSnapshot,
    pub downloads: Option<DownloadsSection>,
    pub uptime: Option<UptimeSummary>,
}
