// Dashboard module - embed layout and the single-message upsert

pub mod dashboard_models;
pub mod dashboard_service;
pub mod dashboard_view;
pub mod providers;

pub use dashboard_models::{DashboardTone, DashboardView};
pub use dashboard_service::{DashboardChannel, DashboardError, DashboardService};
pub use providers::{DownloadsProvider, UptimeProvider};
