use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::library_cache::{collect_library_stats, LibraryStatsCache};
use super::media_api::{JellyfinApi, PlexApi};
use super::media_models::{LibrarySnapshot, ServerSnapshot, ServerStatus};
use super::session::{jellyfin_is_playing, MediaSource};
use super::session_formatter::format_record;
use crate::core::config::{PlexSectionsConfig, UserAliases};

/// Connection bookkeeping shared by both polling tasks.
#[derive(Debug, Default, Clone, Copy)]
struct ConnectionState {
    connected: bool,
    /// First successful connection of the current online stretch.
    started_at: Option<DateTime<Utc>>,
    /// First failed poll of the current offline stretch.
    offline_since: Option<DateTime<Utc>>,
}

/// Polls the primary (Plex) and optional secondary (Jellyfin) server and
/// turns what it sees into a [`ServerSnapshot`].
///
/// Failures never escape: an unreachable Plex server yields an offline
/// snapshot, an unreachable Jellyfin server yields no secondary streams.
pub struct ServerStatusReader<P: PlexApi, J: JellyfinApi> {
    plex: P,
    jellyfin: Option<J>,
    sections: PlexSectionsConfig,
    aliases: UserAliases,
    cache: RwLock<LibraryStatsCache>,
    state: RwLock<ConnectionState>,
}

impl<P, J> ServerStatusReader<P, J>
where
    P: PlexApi,
    J: JellyfinApi,
{
    pub fn new(
        plex: P,
        jellyfin: Option<J>,
        sections: PlexSectionsConfig,
        cache_interval: chrono::Duration,
        aliases: UserAliases,
    ) -> Self {
        Self {
            plex,
            jellyfin,
            sections,
            aliases,
            cache: RwLock::new(LibraryStatsCache::new(cache_interval)),
            state: RwLock::new(ConnectionState::default()),
        }
    }

    pub fn secondary_enabled(&self) -> bool {
        self.jellyfin.is_some()
    }

    /// Primary status with the secondary server's streams merged in.
    pub async fn snapshot(&self) -> ServerSnapshot {
        self.snapshot_at(Utc::now()).await
    }

    pub async fn snapshot_at(&self, now: DateTime<Utc>) -> ServerSnapshot {
        let mut snapshot = self.server_info_at(now).await;
        let secondary = self.secondary_streams().await;
        snapshot.secondary_stream_count = secondary.len();
        snapshot.streams.extend(secondary);
        snapshot
    }

    /// Status of the primary server only.
    pub async fn server_info_at(&self, now: DateTime<Utc>) -> ServerSnapshot {
        if !self.connect(now).await {
            return self.offline_snapshot(now).await;
        }
        self.state.write().await.offline_since = None;

        let libraries = self.library_stats_at(now).await;
        let sessions = match self.plex.sessions().await {
            Ok(sessions) => sessions,
            Err(err) => {
                tracing::error!(error = %err, "Error retrieving server info");
                self.state.write().await.connected = false;
                return self.offline_snapshot(now).await;
            }
        };

        tracing::debug!(count = sessions.len(), "Found active Plex sessions");
        let streams = sessions
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                format_record(MediaSource::Plex, raw, idx + 1, &self.aliases, &libraries)
            })
            .collect();

        let started_at = self.state.read().await.started_at;
        ServerSnapshot {
            status: ServerStatus::Online {
                uptime: format_uptime(started_at, now),
            },
            libraries,
            streams,
            session_count: sessions.len(),
            secondary_stream_count: 0,
        }
    }

    /// Cached library stats, refreshed from the server once stale.
    pub async fn library_stats_at(&self, now: DateTime<Utc>) -> LibrarySnapshot {
        {
            let cache = self.cache.read().await;
            if cache.is_fresh(now) {
                return cache.stats().clone();
            }
        }

        let connected = self.state.read().await.connected;
        if !connected && !self.connect(now).await {
            return self.cache.read().await.stats().clone();
        }

        match collect_library_stats(&self.plex, &self.sections).await {
            Ok(stats) => {
                let mut cache = self.cache.write().await;
                cache.replace(stats.clone(), now);
                tracing::info!(
                    libraries = stats.len(),
                    "Library stats updated and cached"
                );
                stats
            }
            Err(err) => {
                tracing::error!(error = %err, "Error updating library stats");
                self.cache.read().await.stats().clone()
            }
        }
    }

    /// Formatted streams from the secondary server; empty when disabled or
    /// unreachable.
    pub async fn secondary_streams(&self) -> Vec<String> {
        let Some(jellyfin) = &self.jellyfin else {
            return Vec::new();
        };

        let sessions = match jellyfin.sessions().await {
            Ok(sessions) => sessions,
            Err(err) => {
                tracing::error!(error = %err, "Failed to fetch Jellyfin sessions");
                return Vec::new();
            }
        };

        let libraries = LibrarySnapshot::default();
        let active: Vec<_> = sessions.iter().filter(|s| jellyfin_is_playing(s)).collect();
        tracing::debug!(count = active.len(), "Found active Jellyfin sessions");

        active
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| {
                format_record(MediaSource::Jellyfin, raw, idx + 1, &self.aliases, &libraries)
            })
            .collect()
    }

    /// Probe the primary server and update the uptime bookkeeping.
    async fn connect(&self, now: DateTime<Utc>) -> bool {
        let result = self.plex.check_connection().await;
        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                state.connected = true;
                state.started_at.get_or_insert(now);
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to connect to Plex server");
                state.connected = false;
                state.started_at = None;
                false
            }
        }
    }

    async fn offline_snapshot(&self, now: DateTime<Utc>) -> ServerSnapshot {
        let since = *self.state.write().await.offline_since.get_or_insert(now);
        ServerSnapshot {
            status: ServerStatus::Offline { since },
            libraries: LibrarySnapshot::zeroed(&self.sections),
            streams: Vec::new(),
            session_count: 0,
            secondary_stream_count: 0,
        }
    }
}

/// Time since `started_at` as `HH:MM`, saturating at `99+ Hours`.
pub fn format_uptime(started_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(started_at) = started_at else {
        return "Offline".to_string();
    };

    let total_minutes = (now - started_at).num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 99 {
        "99+ Hours".to_string()
    } else {
        format!("{hours:02}:{minutes:02}")
    }
}
