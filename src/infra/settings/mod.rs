pub mod env_settings;

pub use env_settings::{running_in_docker, BotSettings};
