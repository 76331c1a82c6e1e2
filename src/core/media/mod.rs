// Media module - polling Plex/Jellyfin and turning sessions into display text

pub mod library_cache;
pub mod media_api;
pub mod media_models;
pub mod server_status;
pub mod session;
pub mod session_formatter;

pub use media_api::{JellyfinApi, PlexApi};
pub use media_models::{
    format_count, LibrarySection, LibrarySnapshot, LibraryStats, MediaError, SectionCounts,
    ServerSnapshot, ServerStatus,
};
pub use server_status::ServerStatusReader;
