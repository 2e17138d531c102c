//! Startup summary of the layout each core would get.

use std::fmt;

use folium_input::{Haptics, InputSurface, haptics_sink};
use folium_skin::{LayoutSource, SkinRepository, resolve_for_session};
use folium_types::config::FoliumConfig;
use folium_types::geometry::Orientation;
use folium_types::input::LogicalButton;
use folium_types::CoreId;

/// Hold time before the settings button opens the settings menu.
const SETTINGS_LONG_PRESS_MS: u32 = 500;

/// Stand-in motor for a host without one: pulses are only logged.
struct LoggedPulse;

impl Haptics for LoggedPulse {
    fn pulse(&mut self) {
        log::trace!("Haptic pulse");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSummary {
    pub core: CoreId,
    pub orientation: Orientation,
    pub source: LayoutSource,
    pub buttons: usize,
    pub thumbsticks: usize,
    pub screens: usize,
    pub settings_long_press: bool,
    pub haptics: bool,
}

impl fmt::Display for LayoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            LayoutSource::Skin(name) => format!("skin '{name}'"),
            LayoutSource::Generated => "generated".to_string(),
        };
        write!(
            f,
            "{:<7} {:<18} {source}: {} buttons, {} sticks, {} screens",
            self.core.name(),
            self.orientation.key(),
            self.buttons,
            self.thumbsticks,
            self.screens
        )
    }
}

/// Resolve every core's layout in portrait and landscape and build the
/// input surface for it, the way a session would on launch.
pub fn summarize(skins: &SkinRepository, config: &FoliumConfig) -> Vec<LayoutSummary> {
    let viewport = config.viewport();
    let mut out = Vec::new();
    for core in CoreId::ALL {
        let skin = skins.skins_for_core(core).into_iter().next();
        for orientation in [Orientation::Portrait, Orientation::LandscapeRight] {
            let layout = resolve_for_session(skin, core, orientation, viewport);
            let haptics = haptics_sink(config.haptics, LoggedPulse);
            let mut surface = InputSurface::new(&layout, haptics, config.controller_fade_ms);
            let settings_long_press =
                surface.attach_long_press(LogicalButton::Settings, SETTINGS_LONG_PRESS_MS);
            out.push(LayoutSummary {
                core,
                orientation,
                source: layout.source.clone(),
                buttons: surface.buttons().len(),
                thumbsticks: surface.thumbsticks().len(),
                screens: layout.screens.len(),
                settings_long_press,
                haptics: config.haptics,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn every_core_gets_a_layout_without_skins() {
        let summary = summarize(&SkinRepository::new(), &FoliumConfig::default());
        assert_eq!(summary.len(), CoreId::ALL.len() * 2);
        for s in &summary {
            assert_eq!(s.source, LayoutSource::Generated);
            assert!(s.buttons > 0, "{s}");
            assert!(s.settings_long_press, "{s}");
            assert!(s.haptics, "{s}");
        }
        let cytrus = summary.iter().find(|s| s.core == CoreId::Cytrus).unwrap();
        assert_eq!(cytrus.screens, 2);
        assert_eq!(cytrus.thumbsticks, 1);
    }

    #[test]
    fn installed_skin_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let skin_dir = dir.path().join("Retro");
        std::fs::create_dir_all(&skin_dir).unwrap();
        std::fs::write(
            skin_dir.join("info.json"),
            r#"{ "core": "peach", "orientations": { "portrait": {
                "buttons": [{ "x": 10, "y": 600, "width": 60, "height": 60, "type": "a" }]
            } } }"#,
        )
        .unwrap();
        let mut skins = SkinRepository::new();
        skins.load_all(dir.path()).unwrap();

        let summary = summarize(&skins, &FoliumConfig::default());
        let peach: Vec<_> = summary.iter().filter(|s| s.core == CoreId::Peach).collect();
        assert!(peach.iter().all(|s| s.source == LayoutSource::Skin("Retro".into())));
        assert_eq!(peach[0].buttons, 1);
        assert!(!peach[0].settings_long_press);
        assert!(Path::new(&skin_dir).is_dir());
    }

    #[test]
    fn haptics_setting_reaches_every_surface() {
        let config = FoliumConfig::from_toml("haptics = false").unwrap();
        let summary = summarize(&SkinRepository::new(), &config);
        assert!(summary.iter().all(|s| !s.haptics));
    }
}
