// Discord commands module.
// Each feature gets its own command file.

pub mod plex;

// Bot presence management
pub mod presence;
