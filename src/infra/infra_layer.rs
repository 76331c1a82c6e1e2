// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "media/mod.rs"]
pub mod media;

#[path = "storage/mod.rs"]
pub mod storage;

#[path = "settings/mod.rs"]
pub mod settings;
