//! Error types for Folium.

use std::io;

/// Errors produced by the Folium front-end.
#[derive(Debug, thiserror::Error)]
pub enum FoliumError {
    #[error("skin error: {0}")]
    Skin(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("framebuffer error: {0}")]
    Framebuffer(String),

    #[error("core error: {0}")]
    Core(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("library error: {0}")]
    Library(String),

    #[error("cue sheet error: {0}")]
    Cue(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, FoliumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skin_error_display() {
        let e = FoliumError::Skin("missing portrait".into());
        assert_eq!(format!("{e}"), "skin error: missing portrait");
    }

    #[test]
    fn framebuffer_error_display() {
        let e = FoliumError::Framebuffer("short buffer".into());
        assert_eq!(format!("{e}"), "framebuffer error: short buffer");
    }

    #[test]
    fn core_error_display() {
        let e = FoliumError::Core("boot failed".into());
        assert_eq!(format!("{e}"), "core error: boot failed");
    }

    #[test]
    fn cue_error_display() {
        let e = FoliumError::Cue("no FILE entries".into());
        assert_eq!(format!("{e}"), "cue sheet error: no FILE entries");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: FoliumError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: FoliumError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: FoliumError = json_err.into();
        assert!(format!("{e}").contains("JSON error"));
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(FoliumError::Library("oops".into()));
        assert!(r.is_err());
    }
}
