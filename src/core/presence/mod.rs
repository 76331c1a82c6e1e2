pub mod presence_service;

pub use presence_service::{select_presence, PresenceStatus, PresenceUpdate};
