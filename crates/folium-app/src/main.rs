//! Folium entry point.
//!
//! Loads `folium.toml`, scans skins and games, and reports the control
//! layout every core would launch with on the configured screen.
//!
//! Usage:
//!   folium [config.toml]
//!   FOLIUM_CONFIG=~/folium.toml folium

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};

use folium_core::GameLibrary;
use folium_input::InputRouter;
use folium_skin::SkinRepository;
use folium_types::config::FoliumConfig;
use folium_types::CoreId;
use folium_types::input::LogicalButton;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Config path from CLI arg, FOLIUM_CONFIG env var, or the working dir.
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FOLIUM_CONFIG").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("folium.toml"));
    let config = FoliumConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let viewport = config.viewport();
    log::info!(
        "Starting Folium ({}x{}, {:?})",
        viewport.bounds.width,
        viewport.bounds.height,
        viewport.device
    );

    let mut skins = SkinRepository::new();
    if let Err(e) = skins.load_all(&config.skins_dir) {
        log::warn!("No skins loaded: {e}");
    }

    let mut library = GameLibrary::new();
    match library.refresh(&config.documents_dir) {
        Ok(games) => {
            for core in CoreId::ALL {
                let count = games.iter().filter(|g| g.core == core).count();
                if count > 0 {
                    log::info!("{core}: {count} games");
                }
            }
        },
        Err(e) => log::warn!("Game library unavailable: {e}"),
    }

    let router = InputRouter::new();
    for summary in report::summarize(&skins, &config) {
        let routed = LogicalButton::ALL
            .into_iter()
            .filter(|&b| router.native_button(summary.core, b).is_some())
            .count();
        log::info!("{summary} ({routed} routable buttons)");
    }

    Ok(())
}
