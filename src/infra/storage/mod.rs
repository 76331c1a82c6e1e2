// JSON files under the data directory.

pub mod json_files;
pub mod message_id_store;

pub use json_files::{load_config, load_user_aliases};
pub use message_id_store::JsonMessageIdStore;
