//! The overlay's concrete services, in the order the host registers them:
//! debug, settings, hotkeys, game integration.

mod debug;
mod game_integration;
mod hotkeys;
mod settings_service;

pub use debug::{DebugService, FrameCounter};
pub use game_integration::GameIntegrationService;
pub use hotkeys::HotkeysService;
pub use settings_service::SettingsService;
