//! Overlay settings and JSON persistence.
//!
//! Settings live in a single pretty-printed JSON document under the platform
//! config directory. A missing file yields defaults; a malformed file is an
//! error (silently clobbering a user's edits would be worse than failing).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use glimmer_ui::Key;

use crate::error::HudError;

/// The overlay's persisted settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudSettings {
    /// Executable name of the game process the overlay attaches to,
    /// compared case-insensitively.
    pub target_process: String,

    /// Overlay surface size in logical pixels.
    pub overlay_width: u32,
    pub overlay_height: u32,

    /// Saved hotkey bindings: display name to ordered key sequence.
    pub bindings: BTreeMap<String, Vec<Key>>,
}

impl Default for HudSettings {
    fn default() -> Self {
        let mut bindings = BTreeMap::new();
        bindings.insert("Toggle HUD".to_string(), vec![Key::LeftCtrl, Key::H]);
        bindings.insert("Open Settings".to_string(), vec![Key::LeftCtrl, Key::LeftShift, Key::O]);

        Self {
            target_process: "Aurora-64.exe".to_string(),
            overlay_width: 1920,
            overlay_height: 1080,
            bindings,
        }
    }
}

impl HudSettings {
    /// The default settings path under the platform config directory.
    pub fn default_path() -> Result<PathBuf, HudError> {
        let dirs = ProjectDirs::from("io", "glimmer", "glimmer").ok_or(HudError::NoConfigDir)?;
        Ok(dirs.config_dir().join("settings.json"))
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields [`HudSettings::default`].
    pub fn load(path: &Path) -> Result<Self, HudError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(target: "glimmer_hud::settings", ?path, "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(HudError::SettingsRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| HudError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), HudError> {
        let write_err = |source| HudError::SettingsWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).map_err(write_err)?;
        tracing::debug!(target: "glimmer_hud::settings", ?path, "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("glimmer-settings-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn json_round_trip_preserves_bindings() {
        let mut settings = HudSettings::default();
        settings
            .bindings
            .insert("Screenshot".to_string(), vec![Key::F12]);

        let raw = serde_json::to_string(&settings).unwrap();
        let back: HudSettings = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn keys_serialize_as_names() {
        let settings = HudSettings::default();
        let raw = serde_json::to_string(&settings).unwrap();
        assert!(raw.contains("\"LeftCtrl\""));
        assert!(raw.contains("\"H\""));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let loaded = HudSettings::load(Path::new("/definitely/not/here/settings.json")).unwrap();
        assert_eq!(loaded, HudSettings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = scratch_path("round-trip");
        let mut settings = HudSettings::default();
        settings.target_process = "Other.exe".to_string();

        settings.save(&path).unwrap();
        let loaded = HudSettings::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = scratch_path("malformed");
        fs::write(&path, "{ not json").unwrap();

        let result = HudSettings::load(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(HudError::SettingsParse { .. })));
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        // serde(default) + no deny_unknown_fields: forward-compatible files load.
        let raw = r#"{"target_process": "Game.exe", "future_option": true}"#;
        let settings: HudSettings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.target_process, "Game.exe");
        assert_eq!(settings.overlay_width, 1920);
    }
}
