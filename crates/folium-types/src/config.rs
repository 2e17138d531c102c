//! Front-end configuration loaded from `folium.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FoliumError, Result};
use crate::geometry::{DeviceClass, Insets, Size, Viewport};

/// Runtime configuration. Every field has a default, so an empty file
/// (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FoliumConfig {
    /// Root of the per-core `<Core>/roms` folders.
    pub documents_dir: PathBuf,
    /// Root scanned recursively for skin folders.
    pub skins_dir: PathBuf,
    /// Force a device class instead of deriving it from the screen size.
    pub device: Option<DeviceClass>,
    /// Portrait screen width in points.
    pub screen_width: f64,
    /// Portrait screen height in points.
    pub screen_height: f64,
    /// Portrait safe-area insets.
    pub safe_area: Insets,
    /// Duration of the on-screen control fade when a gamepad connects.
    pub controller_fade_ms: u32,
    /// Maximum audio backlog, in ticks, before a chunk is dropped.
    pub audio_backlog_ticks: usize,
    /// Whether `vibrateOnTap` buttons pulse the haptic engine.
    pub haptics: bool,
}

impl Default for FoliumConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("Documents"),
            skins_dir: PathBuf::from("Skins"),
            device: None,
            screen_width: 390.0,
            screen_height: 844.0,
            safe_area: Insets::new(47.0, 0.0, 34.0, 0.0),
            controller_fade_ms: 200,
            audio_backlog_ticks: 6,
            haptics: true,
        }
    }
}

impl FoliumConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FoliumError::Config(format!("folium.toml: {e}")))
    }

    /// Load a configuration file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {} -- using defaults", path.display());
                Ok(Self::default())
            },
            Err(e) => Err(FoliumError::Config(format!("{}: {e}", path.display()))),
        }
    }

    /// The portrait viewport described by this configuration.
    pub fn viewport(&self) -> Viewport {
        let mut vp = Viewport::new(
            Size::new(self.screen_width, self.screen_height),
            self.safe_area,
        );
        if let Some(device) = self.device {
            vp.device = device;
        }
        vp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = FoliumConfig::from_toml("").unwrap();
        assert_eq!(cfg.controller_fade_ms, 200);
        assert_eq!(cfg.audio_backlog_ticks, 6);
        assert!(cfg.haptics);
        assert_eq!(cfg.skins_dir, PathBuf::from("Skins"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = FoliumConfig::from_toml(
            r#"
documents_dir = "/var/folium"
device = "mini"
haptics = false

[safe_area]
top = 50.0
"#,
        )
        .unwrap();
        assert_eq!(cfg.documents_dir, PathBuf::from("/var/folium"));
        assert_eq!(cfg.device, Some(DeviceClass::Mini));
        assert!(!cfg.haptics);
        assert_eq!(cfg.safe_area.top, 50.0);
        assert_eq!(cfg.safe_area.bottom, 0.0);
        assert_eq!(cfg.screen_width, 390.0);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = FoliumConfig::from_toml("haptics = maybe").unwrap_err();
        assert!(matches!(err, FoliumError::Config(_)));
        assert!(format!("{err}").contains("folium.toml"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = FoliumConfig::load(Path::new("/nonexistent/folium.toml")).unwrap();
        assert_eq!(cfg.audio_backlog_ticks, 6);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folium.toml");
        std::fs::write(&path, "controller_fade_ms = 350").unwrap();
        let cfg = FoliumConfig::load(&path).unwrap();
        assert_eq!(cfg.controller_fade_ms, 350);
    }

    #[test]
    fn device_override_applies_to_viewport() {
        let cfg = FoliumConfig {
            device: Some(DeviceClass::Pad),
            ..FoliumConfig::default()
        };
        assert_eq!(cfg.viewport().device, DeviceClass::Pad);
        assert_eq!(FoliumConfig::default().viewport().device, DeviceClass::Standard);
    }
}
