use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::dashboard_models::{DashboardSnapshot, DashboardView, DownloadsSection, UptimeSummary};
use super::dashboard_view::{build_view, total_download_size, MAX_DOWNLOADS_SHOWN};
use super::providers::{DownloadsProvider, UptimeProvider, UptimeWindow};
use crate::core::config::DashboardConfig;
use crate::core::media::ServerSnapshot;
use crate::core::persistence::{MessageIdStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Dashboard message {0} no longer exists")]
    MessageNotFound(u64),
    #[error("Channel error: {0}")]
    Channel(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Where the dashboard message lives.
#[async_trait]
pub trait DashboardChannel: Send + Sync {
    /// Replace the content of an existing message. Must report a deleted
    /// message as [`DashboardError::MessageNotFound`].
    async fn edit_message(&self, message_id: u64, view: &DashboardView)
        -> Result<(), DashboardError>;

    /// Post a new message and return its id.
    async fn send_message(&self, view: &DashboardView) -> Result<u64, DashboardError>;
}

/// Keeps one dashboard message per channel up to date.
pub struct DashboardService<S: MessageIdStore> {
    config: DashboardConfig,
    store: S,
    message_id: Mutex<Option<u64>>,
    downloads: Option<Arc<dyn DownloadsProvider>>,
    uptime: Option<Arc<dyn UptimeProvider>>,
}

impl<S: MessageIdStore> DashboardService<S> {
    /// Loads the remembered message id; an unreadable file counts as none.
    pub async fn new(
        config: DashboardConfig,
        store: S,
        downloads: Option<Arc<dyn DownloadsProvider>>,
        uptime: Option<Arc<dyn UptimeProvider>>,
    ) -> Self {
        let message_id = match store.load().await {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(error = %err, "Error loading dashboard message id");
                None
            }
        };

        Self {
            config,
            store,
            message_id: Mutex::new(message_id),
            downloads,
            uptime,
        }
    }

    /// Combine a server snapshot with whatever the sibling providers report.
    pub async fn gather(&self, server: ServerSnapshot) -> DashboardSnapshot {
        DashboardSnapshot {
            server,
            downloads: self.downloads_section().await,
            uptime: self.uptime_summary(),
        }
    }

    pub fn render(&self, snapshot: &DashboardSnapshot, now: DateTime<Utc>) -> DashboardView {
        build_view(snapshot, &self.config, now)
    }

    /// Render and upsert in one go. Returns the id of the message shown.
    pub async fn refresh<C: DashboardChannel + ?Sized>(
        &self,
        channel: &C,
        server: ServerSnapshot,
    ) -> Result<u64, DashboardError> {
        let snapshot = self.gather(server).await;
        let view = self.render(&snapshot, Utc::now());
        self.publish(channel, &view).await
    }

    /// Edit the remembered message in place, or post a new one when there is
    /// none or it was deleted.
    pub async fn publish<C: DashboardChannel + ?Sized>(
        &self,
        channel: &C,
        view: &DashboardView,
    ) -> Result<u64, DashboardError> {
        let mut current = self.message_id.lock().await;

        if let Some(id) = *current {
            match channel.edit_message(id, view).await {
                Ok(()) => {
                    tracing::debug!(message_id = id, "Dashboard message updated");
                    return Ok(id);
                }
                Err(DashboardError::MessageNotFound(_)) => {
                    tracing::warn!(message_id = id, "Dashboard message not found, creating new one");
                    *current = None;
                }
                Err(err) => return Err(err),
            }
        }

        let id = channel.send_message(view).await?;
        *current = Some(id);
        if let Err(err) = self.store.save(id).await {
            tracing::error!(message_id = id, error = %err, "Error saving dashboard message id");
        }
        tracing::info!(message_id = id, "New dashboard message created");
        Ok(id)
    }

    async fn downloads_section(&self) -> Option<DownloadsSection> {
        let provider = self.downloads.as_ref()?;
        let status = match provider.current_downloads().await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(error = %err, "Downloads provider failed");
                return None;
            }
        };
        if status.downloads.is_empty() {
            return None;
        }

        let shown = &status.downloads[..status.downloads.len().min(MAX_DOWNLOADS_SHOWN)];
        Some(DownloadsSection {
            lines: shown
                .iter()
                .enumerate()
                .map(|(idx, item)| provider.format_download(item, idx))
                .collect(),
            total_count: status.downloads.len(),
            total_size: total_download_size(shown.iter().map(|item| item.size.as_str())),
            free_space: status.free_space,
            total_space: status.total_space,
        })
    }

    fn uptime_summary(&self) -> Option<UptimeSummary> {
        let provider = self.uptime.as_ref()?;
        let history = provider.uptime_history();
        let window = |window: Option<UptimeWindow>| match window {
            Some(w) => format!(
                "{:.1}% ({})",
                w.percent,
                provider.format_online_time(w.online_seconds)
            ),
            None => "No data".to_string(),
        };

        Some(UptimeSummary {
            day: window(history.last_24h),
            week: window(history.last_7d),
            month: window(history.last_30d),
            has_recent_data: history.last_24h.is_some(),
        })
    }
}
