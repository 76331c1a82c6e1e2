// Discord layer - commands, presence, dashboard and background tasks.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "dashboard/mod.rs"]
pub mod dashboard;

pub mod scheduler;

// Re-export command types for convenience
pub use commands::plex::{Data, Error};
