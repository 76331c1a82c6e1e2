// Media server infra layer.
// - `plex_client.rs` talks to the Plex Media Server HTTP API.
// - `jellyfin_client.rs` lists Jellyfin sessions.

pub mod jellyfin_client;
pub mod plex_client;

pub use jellyfin_client::JellyfinApiClient;
pub use plex_client::PlexApiClient;
