// Dashboard message in the configured channel.

pub mod channel;
pub mod embed;
pub mod updater;

pub use updater::{dashboard_tick, update_dashboard};
