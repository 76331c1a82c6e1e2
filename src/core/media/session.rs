//! Session records as the two media servers send them, and the normalized
//! [`StreamSession`] the formatter works with.
//!
//! Both servers ship loosely-shaped JSON whose fields come and go depending on
//! the content type. Every "is this field there" question is answered once, in
//! [`StreamSession::from_plex`] / [`StreamSession::from_jellyfin`].

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Jellyfin reports positions in 100ns ticks.
pub const TICKS_PER_SECOND: u64 = 10_000_000;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Malformed session record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Session has nothing playing")]
    NothingPlaying,
    #[error("Session has no title")]
    MissingTitle,
}

/// Which server a session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSource {
    Plex,
    Jellyfin,
}

/// What is being played, with the fields each kind of title needs.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionKind {
    Episode {
        series: String,
        season: u32,
        episode: u32,
    },
    Movie {
        title: String,
        year: Option<i32>,
    },
    Track {
        artist: String,
        track: String,
    },
}

/// One active playback, independent of the server it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSession {
    pub source: MediaSource,
    pub kind: SessionKind,
    pub user: String,
    /// Library the item belongs to, when the server says.
    pub library: Option<String>,
    pub position_secs: u64,
    /// `None` when the server reports no usable runtime (live TV, for one).
    pub duration_secs: Option<u64>,
    pub paused: bool,
    pub quality: String,
    pub bitrate_mbps: Option<f64>,
    pub transcoding: bool,
    pub client: String,
}

// ============================================================================
// PLEX RECORDS
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexSessionRecord {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub grandparent_title: Option<String>,
    pub parent_index: Option<u32>,
    pub index: Option<u32>,
    pub year: Option<i32>,
    /// Milliseconds.
    pub view_offset: Option<u64>,
    /// Milliseconds.
    pub duration: Option<u64>,
    pub library_section_title: Option<String>,
    #[serde(rename = "User")]
    pub user: Option<PlexUser>,
    #[serde(rename = "Player")]
    pub player: Option<PlexPlayer>,
    #[serde(rename = "Media", default)]
    pub media: Vec<PlexMedia>,
    #[serde(rename = "TranscodeSession")]
    pub transcode_session: Option<PlexTranscodeSession>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlexUser {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlexPlayer {
    pub product: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexMedia {
    pub video_resolution: Option<String>,
    /// kbps.
    pub bitrate: Option<u64>,
    #[serde(rename = "Part", default)]
    pub parts: Vec<PlexPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlexPart {
    #[serde(rename = "Stream", default)]
    pub streams: Vec<PlexStream>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexStream {
    pub stream_type: Option<u8>,
    pub bit_depth: Option<u32>,
    /// Hz.
    pub sampling_rate: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlexTranscodeSession {
    /// kbps, when the server reports it.
    pub bitrate: Option<u64>,
}

const PLEX_AUDIO_STREAM: u8 = 2;

// ============================================================================
// JELLYFIN RECORDS
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JellyfinSessionRecord {
    pub user_name: Option<String>,
    pub client: Option<String>,
    pub device_name: Option<String>,
    pub now_playing_item: Option<JellyfinItem>,
    pub play_state: Option<JellyfinPlayState>,
    pub transcoding_info: Option<JellyfinTranscodingInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JellyfinItem {
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub series_name: Option<String>,
    pub parent_index_number: Option<u32>,
    pub index_number: Option<u32>,
    pub production_year: Option<i32>,
    pub run_time_ticks: Option<u64>,
    /// bps.
    pub bitrate: Option<u64>,
    #[serde(default)]
    pub media_streams: Vec<JellyfinMediaStream>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JellyfinMediaStream {
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JellyfinPlayState {
    pub position_ticks: Option<u64>,
    pub is_paused: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JellyfinTranscodingInfo {
    /// bps.
    pub bitrate: Option<u64>,
}

/// True when a raw Jellyfin session is actually playing something.
pub fn jellyfin_is_playing(raw: &Value) -> bool {
    raw.get("NowPlayingItem").is_some_and(|item| !item.is_null())
}

// ============================================================================
// NORMALIZATION
// ============================================================================

impl StreamSession {
    /// Map one entry of Plex's `/status/sessions` onto a [`StreamSession`].
    pub fn from_plex(raw: &Value) -> Result<Self, SessionError> {
        let record = PlexSessionRecord::deserialize(raw)?;
        let is_track = record.kind.as_deref() == Some("track");

        let kind = if is_track {
            SessionKind::Track {
                artist: record
                    .grandparent_title
                    .clone()
                    .unwrap_or_else(|| "Unknown Artist".to_string()),
                track: record
                    .title
                    .clone()
                    .unwrap_or_else(|| "Unknown Track".to_string()),
            }
        } else if let Some(series) = record.grandparent_title.clone() {
            SessionKind::Episode {
                series,
                season: record.parent_index.unwrap_or(0),
                episode: record.index.unwrap_or(0),
            }
        } else {
            SessionKind::Movie {
                title: record.title.clone().ok_or(SessionError::MissingTitle)?,
                year: record.year.filter(|year| *year > 0),
            }
        };

        let media = record.media.first();
        let quality = if is_track {
            plex_audio_quality(media)
        } else {
            plex_video_quality(media)
        };

        let bitrate_kbps = record
            .transcode_session
            .as_ref()
            .and_then(|t| t.bitrate)
            .filter(|b| *b > 0)
            .or_else(|| media.and_then(|m| m.bitrate).filter(|b| *b > 0));

        let player = record.player.as_ref();
        let client = player
            .and_then(|p| p.product.as_deref())
            .map(clean_plex_product)
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Self {
            source: MediaSource::Plex,
            kind,
            user: record
                .user
                .and_then(|u| u.title)
                .unwrap_or_else(|| "Unknown".to_string()),
            library: record.library_section_title,
            position_secs: record.view_offset.unwrap_or(0) / 1000,
            duration_secs: record.duration.map(|ms| ms / 1000).filter(|s| *s > 0),
            paused: player.and_then(|p| p.state.as_deref()) == Some("paused"),
            quality,
            bitrate_mbps: bitrate_kbps.map(|kbps| kbps as f64 / 1000.0),
            transcoding: record.transcode_session.is_some(),
            client,
        })
    }

    /// Map one entry of Jellyfin's `/Sessions` onto a [`StreamSession`].
    pub fn from_jellyfin(raw: &Value) -> Result<Self, SessionError> {
        let record = JellyfinSessionRecord::deserialize(raw)?;
        let item = record.now_playing_item.ok_or(SessionError::NothingPlaying)?;
        let play_state = record.play_state.unwrap_or_default();

        let kind = if item.kind.as_deref() == Some("Episode") {
            SessionKind::Episode {
                series: item
                    .series_name
                    .clone()
                    .unwrap_or_else(|| "Unknown Show".to_string()),
                season: item.parent_index_number.unwrap_or(0),
                episode: item.index_number.unwrap_or(0),
            }
        } else {
            SessionKind::Movie {
                title: item.name.clone().unwrap_or_else(|| "Unknown".to_string()),
                year: item.production_year.filter(|year| *year > 0),
            }
        };

        let quality = match item
            .media_streams
            .iter()
            .find(|s| s.kind.as_deref() == Some("Video"))
            .and_then(|s| s.height)
        {
            Some(height) if height >= 2160 => "4K".to_string(),
            Some(height) if height > 0 => format!("{height}p"),
            _ => "Video".to_string(),
        };

        let bitrate_bps = record
            .transcoding_info
            .as_ref()
            .and_then(|t| t.bitrate)
            .filter(|b| *b > 0)
            .or(item.bitrate.filter(|b| *b > 0));

        let client = record
            .client
            .filter(|c| !c.is_empty() && c != "Unknown")
            .or(record.device_name.filter(|d| !d.is_empty()))
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Self {
            source: MediaSource::Jellyfin,
            kind,
            user: record.user_name.unwrap_or_else(|| "Unknown".to_string()),
            library: None,
            position_secs: play_state.position_ticks.unwrap_or(0) / TICKS_PER_SECOND,
            duration_secs: item
                .run_time_ticks
                .map(|ticks| ticks / TICKS_PER_SECOND)
                .filter(|s| *s > 0),
            paused: play_state.is_paused.unwrap_or(false),
            quality,
            bitrate_mbps: bitrate_bps.map(|bps| bps as f64 / 1_000_000.0),
            transcoding: record.transcoding_info.is_some(),
            client: format!("{client} (JF)"),
        })
    }
}

fn plex_video_quality(media: Option<&PlexMedia>) -> String {
    let Some(resolution) = media.map(|m| m.video_resolution.as_deref().unwrap_or("1080")) else {
        return "1080p".to_string();
    };
    let resolution = resolution.trim();

    if resolution.eq_ignore_ascii_case("4k") {
        return "4K".to_string();
    }
    if let Ok(height) = resolution.trim_end_matches(['p', 'P']).parse::<u32>() {
        return if height >= 2160 {
            "4K".to_string()
        } else {
            format!("{height}p")
        };
    }
    resolution.to_uppercase()
}

fn plex_audio_quality(media: Option<&PlexMedia>) -> String {
    let audio = media.and_then(|m| {
        m.parts
            .iter()
            .flat_map(|part| part.streams.iter())
            .find(|stream| stream.stream_type == Some(PLEX_AUDIO_STREAM))
    });

    let mut labels = Vec::new();
    if let Some(depth) = audio.and_then(|a| a.bit_depth) {
        labels.push(format!("{depth}bit"));
    }
    if let Some(rate) = audio.and_then(|a| a.sampling_rate) {
        labels.push(format!("{}kHz", rate / 1000));
    }

    if labels.is_empty() {
        "Audio".to_string()
    } else {
        labels.join(" ")
    }
}

fn clean_plex_product(product: &str) -> String {
    product
        .replace("Plex for ", "")
        .replace("Infuse-Library", "Infuse")
}
