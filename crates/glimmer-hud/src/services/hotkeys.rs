//! Hotkey registration and persistence.
//!
//! Loads saved bindings from the settings document into the shared
//! [`BindingRegistry`](crate::registry::BindingRegistry) and writes the
//! registry's state back on unload (the settings service saves the file
//! afterwards - it unloads later because it registered earlier).

use glimmer_ui::KeyBinding;

use crate::service::{HudContext, Service};

/// Service bridging the binding registry and the settings document.
#[derive(Default)]
pub struct HotkeysService;

impl HotkeysService {
    /// Create the service.
    pub fn new() -> Self {
        Self
    }
}

impl Service for HotkeysService {
    fn name(&self) -> &'static str {
        "hotkeys"
    }

    fn load(&mut self, ctx: &HudContext) {
        let saved = ctx.settings.read().bindings.clone();
        for (name, keys) in saved {
            ctx.bindings.register(KeyBinding::new(name, keys));
        }
        tracing::debug!(
            target: "glimmer_hud::hotkeys",
            count = ctx.bindings.len(),
            "bindings registered"
        );
    }

    fn unload(&mut self, ctx: &HudContext) {
        let mut settings = ctx.settings.write();
        for binding in ctx.bindings.bindings() {
            settings
                .bindings
                .insert(binding.name().to_string(), binding.keys());
        }
    }
}
