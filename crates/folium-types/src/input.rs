//! Core-agnostic input vocabulary.
//!
//! Skins and the on-screen surface speak only in these types. Translation to
//! each core's native button numbering happens in the input router.

use serde::{Deserialize, Serialize};

/// A core-agnostic on-screen button.
///
/// The serde names are the skin-file vocabulary. PlayStation-style and
/// older skin names are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogicalButton {
    #[serde(rename = "a", alias = "circle")]
    A,
    #[serde(rename = "b", alias = "cross")]
    B,
    #[serde(rename = "x", alias = "triangle")]
    X,
    #[serde(rename = "y", alias = "square")]
    Y,
    #[serde(rename = "up", alias = "dpadUp")]
    Up,
    #[serde(rename = "down", alias = "dpadDown")]
    Down,
    #[serde(rename = "left", alias = "dpadLeft")]
    Left,
    #[serde(rename = "right", alias = "dpadRight")]
    Right,
    #[serde(rename = "l", alias = "l1")]
    L,
    #[serde(rename = "r", alias = "r1")]
    R,
    #[serde(rename = "zl", alias = "l2")]
    ZL,
    #[serde(rename = "zr", alias = "r2")]
    ZR,
    #[serde(rename = "home")]
    Home,
    #[serde(rename = "minus", alias = "select")]
    Minus,
    #[serde(rename = "plus", alias = "start")]
    Plus,
    #[serde(rename = "settings")]
    Settings,
    #[serde(rename = "loadState")]
    LoadState,
    #[serde(rename = "saveState")]
    SaveState,
}

impl LogicalButton {
    pub const ALL: [LogicalButton; 18] = [
        LogicalButton::A,
        LogicalButton::B,
        LogicalButton::X,
        LogicalButton::Y,
        LogicalButton::Up,
        LogicalButton::Down,
        LogicalButton::Left,
        LogicalButton::Right,
        LogicalButton::L,
        LogicalButton::R,
        LogicalButton::ZL,
        LogicalButton::ZR,
        LogicalButton::Home,
        LogicalButton::Minus,
        LogicalButton::Plus,
        LogicalButton::Settings,
        LogicalButton::LoadState,
        LogicalButton::SaveState,
    ];

    pub fn is_dpad(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// Buttons handled by the front-end rather than forwarded as a pad press.
    pub fn is_frontend_action(self) -> bool {
        matches!(self, Self::Settings | Self::LoadState | Self::SaveState)
    }
}

/// Which analog stick a thumbstick control drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThumbstickKind {
    Left,
    Right,
}

/// A 2D stick deflection. `y` is positive upwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// A normalized event produced by the on-screen input surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A button entered the pressed state.
    ButtonDown(LogicalButton),
    /// A button left the pressed state.
    ButtonUp(LogicalButton),
    /// A thumbstick is being dragged.
    ThumbstickMoved(ThumbstickKind, Vector2),
    /// A thumbstick was released. The vector is always zero.
    ThumbstickEnded(ThumbstickKind, Vector2),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str) -> LogicalButton {
        serde_json::from_str(&format!("\"{name}\"")).unwrap()
    }

    #[test]
    fn canonical_names() {
        assert_eq!(parse("a"), LogicalButton::A);
        assert_eq!(parse("zr"), LogicalButton::ZR);
        assert_eq!(parse("loadState"), LogicalButton::LoadState);
        assert_eq!(parse("home"), LogicalButton::Home);
    }

    #[test]
    fn legacy_aliases() {
        assert_eq!(parse("circle"), LogicalButton::A);
        assert_eq!(parse("cross"), LogicalButton::B);
        assert_eq!(parse("triangle"), LogicalButton::X);
        assert_eq!(parse("square"), LogicalButton::Y);
        assert_eq!(parse("dpadUp"), LogicalButton::Up);
        assert_eq!(parse("select"), LogicalButton::Minus);
        assert_eq!(parse("start"), LogicalButton::Plus);
        assert_eq!(parse("l1"), LogicalButton::L);
        assert_eq!(parse("r1"), LogicalButton::R);
        assert_eq!(parse("l2"), LogicalButton::ZL);
        assert_eq!(parse("r2"), LogicalButton::ZR);
    }

    #[test]
    fn unknown_name_rejected() {
        assert!(serde_json::from_str::<LogicalButton>("\"turbo\"").is_err());
    }

    #[test]
    fn serializes_canonical_name() {
        assert_eq!(serde_json::to_string(&LogicalButton::ZL).unwrap(), "\"zl\"");
        assert_eq!(serde_json::to_string(&LogicalButton::Minus).unwrap(), "\"minus\"");
    }

    #[test]
    fn thumbstick_kind_names() {
        let k: ThumbstickKind = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(k, ThumbstickKind::Right);
    }

    #[test]
    fn vector_magnitude() {
        assert!((Vector2::new(3.0, 4.0).magnitude() - 5.0).abs() < 1e-12);
        assert_eq!(Vector2::ZERO.magnitude(), 0.0);
    }

    #[test]
    fn frontend_actions() {
        assert!(LogicalButton::Settings.is_frontend_action());
        assert!(LogicalButton::SaveState.is_frontend_action());
        assert!(!LogicalButton::Home.is_frontend_action());
        assert!(LogicalButton::Left.is_dpad());
    }
}
