// Contracts for the sibling services that enrich the dashboard.
//
// Implementations live outside this crate's concern (a download manager, an
// uptime tracker); the dashboard only consumes what they report.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// One entry of the download queue.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadItem {
    pub filename: String,
    pub status: String,
    pub percentage: f64,
    /// Human size such as `"512 KB"`, `"1.5 GB"` or `"Unknown"`.
    pub size: String,
    pub time_left: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadsStatus {
    pub downloads: Vec<DownloadItem>,
    pub free_space: String,
    pub total_space: String,
}

#[async_trait]
pub trait DownloadsProvider: Send + Sync {
    async fn current_downloads(&self) -> Result<DownloadsStatus, ProviderError>;

    /// Display text for one queue entry; `index` is 0-based.
    fn format_download(&self, item: &DownloadItem, index: usize) -> String;
}

/// Availability over one time window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UptimeWindow {
    pub percent: f64,
    pub online_seconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UptimeHistory {
    pub last_24h: Option<UptimeWindow>,
    pub last_7d: Option<UptimeWindow>,
    pub last_30d: Option<UptimeWindow>,
}

pub trait UptimeProvider: Send + Sync {
    fn uptime_history(&self) -> UptimeHistory;

    fn format_online_time(&self, seconds: u64) -> String;
}
