//! Error types for the overlay host.

use std::path::PathBuf;

/// Errors surfaced while starting or tearing down the overlay.
#[derive(Debug, thiserror::Error)]
pub enum HudError {
    #[error("core error: {0}")]
    Core(#[from] glimmer_core::CoreError),

    #[error("failed to read settings from {path:?}: {source}")]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write settings to {path:?}: {source}")]
    SettingsWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("settings file {path:?} is not valid JSON: {source}")]
    SettingsParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode settings: {0}")]
    SettingsEncode(#[from] serde_json::Error),

    #[error("no platform config directory available")]
    NoConfigDir,

    #[error("service {name} failed to initialize: {reason}")]
    ServiceInit { name: &'static str, reason: String },
}
