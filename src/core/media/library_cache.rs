use chrono::{DateTime, Duration, Utc};

use super::media_api::PlexApi;
use super::media_models::{LibrarySnapshot, LibraryStats, MediaError};
use crate::core::config::PlexSectionsConfig;

/// Time-boxed copy of the last successful library scan.
///
/// The cache is only ever replaced as a whole; a failed refresh leaves the
/// previous snapshot in place.
#[derive(Debug, Clone)]
pub struct LibraryStatsCache {
    stats: LibrarySnapshot,
    last_refresh: Option<DateTime<Utc>>,
    interval: Duration,
}

impl LibraryStatsCache {
    pub fn new(interval: Duration) -> Self {
        Self {
            stats: LibrarySnapshot::default(),
            last_refresh: None,
            interval,
        }
    }

    /// Fresh while no more than `interval` has passed since the last refresh.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.last_refresh
            .is_some_and(|refreshed| now - refreshed <= self.interval)
    }

    pub fn stats(&self) -> &LibrarySnapshot {
        &self.stats
    }

    pub fn replace(&mut self, stats: LibrarySnapshot, now: DateTime<Utc>) {
        self.stats = stats;
        self.last_refresh = Some(now);
    }
}

/// Scan the server's libraries into display-ready stats.
///
/// Configured libraries come first in configured order. With `show_all`,
/// every other library follows under its raw title.
pub async fn collect_library_stats<P: PlexApi + ?Sized>(
    plex: &P,
    config: &PlexSectionsConfig,
) -> Result<LibrarySnapshot, MediaError> {
    let sections = plex.library_sections().await?;
    let mut entries = Vec::with_capacity(sections.len());

    for (title, display) in config.sections.iter() {
        let Some(section) = sections.iter().find(|s| s.title == title) else {
            continue;
        };
        let counts = plex
            .section_counts(&section.key, display.show_episodes)
            .await?;
        entries.push(LibraryStats::configured(title, counts, display));
    }

    if config.show_all {
        for section in sections
            .iter()
            .filter(|s| !config.sections.contains(&s.title))
        {
            let counts = plex.section_counts(&section.key, false).await?;
            entries.push(LibraryStats::unconfigured(&section.title, counts.items));
        }
    }

    Ok(LibrarySnapshot::new(entries))
}
