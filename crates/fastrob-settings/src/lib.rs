//! # fastrob Settings
//!
//! Pipeline configuration, its JSON/TOML persistence and validation.

pub mod config;
pub mod error;

pub use config::{Config, NativeSettings, PostProcessSettings, Source};
pub use error::{SettingsError, SettingsResult};
