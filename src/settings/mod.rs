//! Settings module - per-device banner settings stored in the vault

mod types;
mod migrate;
pub mod loader;

pub use types::*;
pub use loader::{load_settings, save_settings, settings_path};
