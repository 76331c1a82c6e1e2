pub mod plex_config;
pub mod user_aliases;

pub use plex_config::{
    CacheConfig, DashboardConfig, PlexBotConfig, PlexSectionsConfig, PresenceConfig,
    PresenceSection, SectionDisplay, SectionOverrides, DEFAULT_LIBRARY_EMOJI,
};
pub use user_aliases::UserAliases;
