//! Glimmer overlay entry point.

use tracing_subscriber::EnvFilter;

use glimmer_core::Application;
use glimmer_hud::OverlayHost;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info so service lifecycle and game detection show up.
            EnvFilter::new("info")
        }))
        .init();

    let app = Application::new()?;
    let mut host = OverlayHost::with_default_services(None);

    let result = app.run_with(&mut host);

    // Unload services (saving settings) even when the loop errored out.
    host.shutdown();
    result?;

    Ok(())
}
