// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "config/mod.rs"]
pub mod config;

#[path = "media/mod.rs"]
pub mod media;

#[path = "presence/mod.rs"]
pub mod presence;

#[path = "dashboard/mod.rs"]
pub mod dashboard;

pub mod persistence;
