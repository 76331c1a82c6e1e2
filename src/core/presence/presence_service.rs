// Presence text selection.
//
// Pure: turns a snapshot into the short line shown under the bot's name. The
// Discord layer decides how to apply it.

use crate::core::config::PresenceConfig;
use crate::core::media::{format_count, ServerSnapshot};

pub const NOTHING_TO_SHOW: &str = "No streams or sections configured";

/// Status dot shown next to the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceStatus {
    Online,
    DoNotDisturb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceUpdate {
    pub text: String,
    pub status: PresenceStatus,
}

/// Offline beats active streams, active streams beat the library summary.
pub fn select_presence(snapshot: &ServerSnapshot, config: &PresenceConfig) -> PresenceUpdate {
    if !snapshot.is_online() {
        return PresenceUpdate {
            text: config.offline_text.clone(),
            status: PresenceStatus::DoNotDisturb,
        };
    }

    let active = snapshot.stream_count();
    let text = if active > 0 {
        config.stream_text_for(active)
    } else {
        library_summary(snapshot, config)
    };

    PresenceUpdate {
        text,
        status: PresenceStatus::Online,
    }
}

fn library_summary(snapshot: &ServerSnapshot, config: &PresenceConfig) -> String {
    let parts: Vec<String> = config
        .sections
        .iter()
        .filter_map(|section| {
            snapshot.libraries.get(&section.section_title).map(|stats| {
                format!(
                    "{} {} {}",
                    format_count(stats.count),
                    section.display_name,
                    section.emoji
                )
            })
        })
        .collect();

    if parts.is_empty() {
        NOTHING_TO_SHOW.to_string()
    } else {
        parts.join(" | ")
    }
}
