//! Turns sessions into the three-line blocks shown on the dashboard.
//!
//! Everything here is pure: no I/O, no clocks. A session that cannot be
//! normalized becomes a numbered placeholder instead of an error, so one bad
//! record never hides the rest of the stream list.

use serde_json::Value;

use super::media_models::LibrarySnapshot;
use super::session::{MediaSource, SessionKind, StreamSession};
use crate::core::config::UserAliases;

const PROGRESS_SEGMENTS: usize = 10;
const PAUSED_GLYPH: &str = "⏸️";
const TRANSCODE_GLYPH: &str = "🔄";
const DIRECT_PLAY_GLYPH: &str = "⏯️";

/// Format one raw record from `source`, falling back to a placeholder.
///
/// `index` is 1-based and only shows up in the placeholder.
pub fn format_record(
    source: MediaSource,
    raw: &Value,
    index: usize,
    aliases: &UserAliases,
    libraries: &LibrarySnapshot,
) -> String {
    let normalized = match source {
        MediaSource::Plex => StreamSession::from_plex(raw),
        MediaSource::Jellyfin => StreamSession::from_jellyfin(raw),
    };

    match normalized {
        Ok(session) => {
            let block = format_session(&session, aliases, libraries);
            tracing::debug!(index, source = ?source, "Formatted stream info:\n{block}");
            block
        }
        Err(err) => {
            tracing::error!(index, source = ?source, error = %err, "Error formatting stream info");
            placeholder(source, index)
        }
    }
}

/// The block shown for a record that could not be read.
pub fn placeholder(source: MediaSource, index: usize) -> String {
    match source {
        MediaSource::Plex => format!("```❓ Stream could not be loaded (#{index})```"),
        MediaSource::Jellyfin => {
            format!("```❓ Jellyfin stream could not be loaded (#{index})```")
        }
    }
}

/// Render a normalized session as header, progress and footer lines.
pub fn format_session(
    session: &StreamSession,
    aliases: &UserAliases,
    libraries: &LibrarySnapshot,
) -> String {
    let glyph = session
        .library
        .as_deref()
        .and_then(|library| libraries.get(library))
        .map(|stats| stats.emoji.clone())
        .unwrap_or_else(|| content_glyph(&session.kind).to_string());

    let user = aliases.display_name(&session.user);
    let title = format_title(&session.kind);

    let progress = if session.paused {
        PAUSED_GLYPH.to_string()
    } else {
        progress_bar(progress_percent(session.position_secs, session.duration_secs))
    };

    let total = session.duration_secs.unwrap_or(0);
    let current_time = format_clock(session.position_secs, total);
    let total_time = format_clock(total, total);

    let transcode = if session.transcoding {
        TRANSCODE_GLYPH
    } else {
        DIRECT_PLAY_GLYPH
    };
    let bitrate = session
        .bitrate_mbps
        .map(|mbps| format!(" {mbps:.1} Mbps"))
        .unwrap_or_default();

    format!(
        "**```{glyph} {title} | {user}\n\
         └─ {progress} | {current_time}/{total_time}\n \
         └─ {transcode} {quality}{bitrate} | {client}```**",
        quality = session.quality,
        client = session.client,
    )
}

/// Title line for each kind of content.
pub fn format_title(kind: &SessionKind) -> String {
    match kind {
        SessionKind::Episode {
            series,
            season,
            episode,
        } => format!("{} - S{season:02}E{episode:02}", short_series_name(series)),
        SessionKind::Movie {
            title,
            year: Some(year),
        } => format!("{title} ({year})"),
        SessionKind::Movie { title, year: None } => title.clone(),
        SessionKind::Track { artist, track } => format!("{artist} - {track}"),
    }
}

/// Series names are cut at the first `:` or `-` to keep the header short.
fn short_series_name(series: &str) -> &str {
    series
        .split(':')
        .next()
        .and_then(|part| part.split('-').next())
        .unwrap_or(series)
        .trim()
}

fn content_glyph(kind: &SessionKind) -> &'static str {
    match kind {
        SessionKind::Track { .. } => "🎵",
        SessionKind::Movie { .. } => "🎥",
        SessionKind::Episode { .. } => "📺",
    }
}

/// Percent watched, clamped to 0..=100. Zero when the duration is unknown.
pub fn progress_percent(position_secs: u64, duration_secs: Option<u64>) -> f64 {
    match duration_secs {
        Some(duration) if duration > 0 => {
            (position_secs as f64 / duration as f64 * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

/// `[▓▓▓░░░░░░░] 34.0%`
pub fn progress_bar(percent: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 10.0) as usize).min(PROGRESS_SEGMENTS);
    format!(
        "[{}{}] {percent:.1}%",
        "▓".repeat(filled),
        "░".repeat(PROGRESS_SEGMENTS - filled)
    )
}

/// `MM:SS` when the content is shorter than an hour, `H:MM:SS` otherwise.
///
/// The layout depends on `total_secs`, so position and duration of the same
/// item always line up.
pub fn format_clock(seconds: u64, total_secs: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if total_secs < 3600 {
        format!("{minutes:02}:{secs:02}")
    } else {
        format!("{hours}:{minutes:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::media::LibraryStats;
    use serde_json::json;
    use std::collections::HashMap;

    fn movie_session() -> StreamSession {
        StreamSession {
            source: MediaSource::Plex,
            kind: SessionKind::Movie {
                title: "Inception".to_string(),
                year: Some(2010),
            },
            user: "cobb".to_string(),
            library: Some("Movies".to_string()),
            position_secs: 4410,
            duration_secs: Some(8880),
            paused: false,
            quality: "4K".to_string(),
            bitrate_mbps: Some(42.3),
            transcoding: false,
            client: "Apple TV".to_string(),
        }
    }

    #[test]
    fn clock_layout_follows_total_duration() {
        assert_eq!(format_clock(0, 0), "00:00");
        assert_eq!(format_clock(754, 1500), "12:34");
        assert_eq!(format_clock(3599, 3599), "59:59");
        assert_eq!(format_clock(3600, 3600), "1:00:00");
        assert_eq!(format_clock(62, 7200), "0:01:02");
    }

    #[test]
    fn progress_bar_has_ten_segments() {
        assert_eq!(progress_bar(0.0), "[░░░░░░░░░░] 0.0%");
        assert_eq!(progress_bar(49.6), "[▓▓▓▓░░░░░░] 49.6%");
        assert_eq!(progress_bar(100.0), "[▓▓▓▓▓▓▓▓▓▓] 100.0%");
        assert_eq!(progress_bar(250.0), "[▓▓▓▓▓▓▓▓▓▓] 100.0%");
    }

    #[test]
    fn unknown_duration_is_not_progressable() {
        assert_eq!(progress_percent(500, None), 0.0);
        assert_eq!(progress_percent(500, Some(0)), 0.0);
        assert_eq!(progress_percent(50, Some(100)), 50.0);
    }

    #[test]
    fn titles_follow_content_kind() {
        assert_eq!(
            format_title(&SessionKind::Episode {
                series: "Star Trek: Discovery".to_string(),
                season: 4,
                episode: 9
            }),
            "Star Trek - S04E09"
        );
        assert_eq!(
            format_title(&SessionKind::Episode {
                series: "Spider-Man".to_string(),
                season: 1,
                episode: 1
            }),
            "Spider - S01E01"
        );
        assert_eq!(
            format_title(&SessionKind::Movie {
                title: "Up".to_string(),
                year: None
            }),
            "Up"
        );
        assert_eq!(
            format_title(&SessionKind::Track {
                artist: "Daft Punk".to_string(),
                track: "Veridis Quo".to_string()
            }),
            "Daft Punk - Veridis Quo"
        );
    }

    #[test]
    fn session_renders_three_lines() {
        let aliases = UserAliases::new(HashMap::from([(
            "cobb".to_string(),
            "Dom".to_string(),
        )]));
        let libraries = LibrarySnapshot::new(vec![LibraryStats {
            title: "Movies".to_string(),
            count: 10,
            episodes: 0,
            display_name: "Films".to_string(),
            emoji: "🍿".to_string(),
            show_episodes: false,
        }]);

        let block = format_session(&movie_session(), &aliases, &libraries);

        assert_eq!(
            block,
            "**```🍿 Inception (2010) | Dom\n\
             └─ [▓▓▓▓░░░░░░] 49.7% | 1:13:30/2:28:00\n \
             └─ ⏯️ 4K 42.3 Mbps | Apple TV```**"
        );
    }

    #[test]
    fn paused_session_without_bitrate() {
        let mut session = movie_session();
        session.paused = true;
        session.bitrate_mbps = None;
        session.transcoding = true;
        session.library = None;

        let block = format_session(&session, &UserAliases::default(), &LibrarySnapshot::default());
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("**```🎥 Inception (2010) | cobb"));
        assert!(lines[1].contains("⏸️ | 1:13:30/2:28:00"));
        assert!(lines[2].ends_with("🔄 4K | Apple TV```**"));
    }

    #[test]
    fn bad_records_become_numbered_placeholders() {
        let aliases = UserAliases::default();
        let libraries = LibrarySnapshot::default();

        let plex = format_record(MediaSource::Plex, &json!({ "type": "movie" }), 3, &aliases, &libraries);
        assert_eq!(plex, "```❓ Stream could not be loaded (#3)```");

        let jellyfin = format_record(MediaSource::Jellyfin, &json!("not a session"), 1, &aliases, &libraries);
        assert_eq!(jellyfin, "```❓ Jellyfin stream could not be loaded (#1)```");
    }

    #[test]
    fn sparse_records_still_render_three_lines() {
        let sparse = [
            json!({ "title": "Bare" }),
            json!({ "grandparentTitle": "Show" }),
            json!({ "type": "track" }),
        ];
        for (idx, raw) in sparse.iter().enumerate() {
            let block = format_record(
                MediaSource::Plex,
                raw,
                idx + 1,
                &UserAliases::default(),
                &LibrarySnapshot::default(),
            );
            assert_eq!(block.lines().count(), 3, "record {idx} rendered {block}");
            assert!(block.contains("00:00/00:00"));
        }

        let jellyfin = format_record(
            MediaSource::Jellyfin,
            &json!({ "NowPlayingItem": {} }),
            1,
            &UserAliases::default(),
            &LibrarySnapshot::default(),
        );
        assert_eq!(jellyfin.lines().count(), 3);
        assert!(jellyfin.contains("Unknown (JF)"));
    }
}
