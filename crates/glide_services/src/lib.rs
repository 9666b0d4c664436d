//! Glide Services Layer
//!
//! Platform-facing pieces the sync layer consumes: live key state and
//! file-backed settings.

pub mod input;
pub mod settings;

pub use input::KeyStates;
pub use settings::{Settings, SettingsError};
