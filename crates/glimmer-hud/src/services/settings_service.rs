//! Settings file lifecycle.
//!
//! Loads the settings document at init (before any service that reads it)
//! and saves it at unload. Registered before the hotkeys service so the
//! reverse-order unload writes bindings into the document first, then this
//! service persists the file.

use std::path::PathBuf;

use crate::error::HudError;
use crate::service::{HudContext, Service};
use crate::settings::HudSettings;

/// Service owning settings persistence.
pub struct SettingsService {
    path: Option<PathBuf>,
}

impl SettingsService {
    /// Use the default platform config path.
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Use an explicit settings path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn resolve_path(&mut self) -> Result<&PathBuf, HudError> {
        if self.path.is_none() {
            self.path = Some(HudSettings::default_path()?);
        }
        Ok(self.path.as_ref().unwrap())
    }
}

impl Default for SettingsService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for SettingsService {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn init(&mut self, ctx: &HudContext) -> Result<(), HudError> {
        let path = match self.resolve_path() {
            Ok(path) => path.clone(),
            Err(err) => {
                tracing::warn!(target: "glimmer_hud::settings", %err, "settings unavailable, using defaults");
                return Ok(());
            }
        };

        match HudSettings::load(&path) {
            Ok(settings) => *ctx.settings.write() = settings,
            // A broken file should not stop the overlay; keep the defaults
            // and leave the file alone until the user fixes it.
            Err(err) => {
                tracing::warn!(target: "glimmer_hud::settings", %err, "falling back to default settings");
            }
        }
        Ok(())
    }

    fn unload(&mut self, ctx: &HudContext) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(err) = ctx.settings.read().save(path) {
            tracing::error!(target: "glimmer_hud::settings", %err, "failed to save settings");
        }
    }
}
