//! Skin documents: the `info.json` schema.
//!
//! A skin is authored for one core and describes, per interface
//! orientation, where buttons, thumbsticks and screen viewports go. Geometry
//! is in the skin's own coordinate space (absolute points for the device the
//! skin was made for).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use folium_types::error::{FoliumError, Result};
use folium_types::geometry::{Orientation, Rect};
use folium_types::input::{LogicalButton, ThumbstickKind};
use folium_types::CoreId;

/// Skin author credits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub socials: Vec<Social>,
}

/// A social handle (`{"type": "github", "username": "..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct Social {
    #[serde(rename = "type")]
    pub kind: String,
    pub username: String,
}

/// Visual treatment of a control.
///
/// Skins name the style as a string; unknown names degrade to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlStyle {
    #[default]
    Default,
    Blurred,
    Bordered,
}

impl ControlStyle {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "blurred" => Self::Blurred,
            "bordered" => Self::Bordered,
            "default" | "" => Self::Default,
            other => {
                log::debug!("Unknown control style '{other}' -- using default");
                Self::Default
            },
        }
    }
}

fn style_from_name<'de, D>(de: D) -> std::result::Result<ControlStyle, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(de)?;
    Ok(name.as_deref().map(ControlStyle::from_name).unwrap_or_default())
}

/// One on-screen button.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonDef {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub kind: LogicalButton,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub background_image_name: Option<String>,
    /// Invisible hit region only.
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub vibrate_on_tap: bool,
    #[serde(default, deserialize_with = "style_from_name")]
    pub style: ControlStyle,
}

impl ButtonDef {
    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// One on-screen analog stick.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbstickDef {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub kind: ThumbstickKind,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub background_image_name: Option<String>,
    #[serde(default)]
    pub vibrate_on_tap: bool,
    #[serde(default, deserialize_with = "style_from_name")]
    pub style: ControlStyle,
}

impl ThumbstickDef {
    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A viewport where one of the core's screens is drawn. No input semantics.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScreenDef {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenDef {
    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Controls and screens for one orientation, in draw order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default)]
    pub buttons: Vec<ButtonDef>,
    #[serde(default)]
    pub thumbsticks: Vec<ThumbstickDef>,
    #[serde(default)]
    pub screens: Vec<ScreenDef>,
    #[serde(default)]
    pub background_image_name: Option<String>,
}

impl Layout {
    fn validate(&self, orientation: &str) -> Result<()> {
        for (i, b) in self.buttons.iter().enumerate() {
            check_frame(b.frame(), orientation, "button", i)?;
            check_alpha(b.alpha, orientation, "button", i)?;
        }
        for (i, t) in self.thumbsticks.iter().enumerate() {
            check_frame(t.frame(), orientation, "thumbstick", i)?;
            check_alpha(t.alpha, orientation, "thumbstick", i)?;
        }
        for (i, s) in self.screens.iter().enumerate() {
            check_frame(s.frame(), orientation, "screen", i)?;
        }
        Ok(())
    }
}

fn check_frame(frame: Rect, orientation: &str, what: &str, index: usize) -> Result<()> {
    if !frame.is_finite() || frame.width < 0.0 || frame.height < 0.0 {
        return Err(FoliumError::Skin(format!(
            "{orientation} {what} #{index}: invalid geometry {frame:?}"
        )));
    }
    Ok(())
}

fn check_alpha(alpha: Option<f64>, orientation: &str, what: &str, index: usize) -> Result<()> {
    match alpha {
        Some(a) if !(0.0..=1.0).contains(&a) => Err(FoliumError::Skin(format!(
            "{orientation} {what} #{index}: alpha {a} outside 0..=1"
        ))),
        _ => Ok(()),
    }
}

/// Per-orientation layouts. Portrait is mandatory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orientations {
    pub portrait: Layout,
    #[serde(default)]
    pub portrait_upside_down: Option<Layout>,
    #[serde(default)]
    pub landscape_left: Option<Layout>,
    #[serde(default)]
    pub landscape_right: Option<Layout>,
}

impl Orientations {
    /// The layout authored for exactly this orientation, if any.
    pub fn get(&self, orientation: Orientation) -> Option<&Layout> {
        match orientation {
            Orientation::Unknown | Orientation::Portrait => Some(&self.portrait),
            Orientation::PortraitUpsideDown => self.portrait_upside_down.as_ref(),
            Orientation::LandscapeLeft => self.landscape_left.as_ref(),
            Orientation::LandscapeRight => self.landscape_right.as_ref(),
        }
    }

    fn each(&self) -> impl Iterator<Item = (Orientation, &Layout)> {
        [
            Orientation::Portrait,
            Orientation::PortraitUpsideDown,
            Orientation::LandscapeLeft,
            Orientation::LandscapeRight,
        ]
        .into_iter()
        .filter_map(|o| self.get(o).map(|l| (o, l)))
    }
}

/// The parsed contents of a skin's `info.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SkinDocument {
    #[serde(default)]
    pub author: Author,
    pub core: CoreId,
    pub orientations: Orientations,
    /// Opacity applied to every control, overriding per-control alpha.
    #[serde(default, rename = "alpha", alias = "sharedAlpha")]
    pub shared_alpha: Option<f64>,
    #[serde(default)]
    pub debugging: bool,
}

impl SkinDocument {
    /// Parse and validate a document.
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: SkinDocument = serde_json::from_str(text)?;
        doc.validate()?;
        Ok(doc)
    }

    fn validate(&self) -> Result<()> {
        if let Some(a) = self.shared_alpha
            && !(0.0..=1.0).contains(&a)
        {
            return Err(FoliumError::Skin(format!("shared alpha {a} outside 0..=1")));
        }
        for (orientation, layout) in self.orientations.each() {
            layout.validate(orientation.key())?;
        }
        Ok(())
    }
}

/// A loaded skin together with where it came from.
#[derive(Debug, Clone)]
pub struct Skin {
    /// Skin folder name.
    pub name: String,
    /// Folder containing `info.json`; asset names resolve against it.
    pub base_dir: PathBuf,
    pub document: SkinDocument,
}

impl Skin {
    /// Build a skin from document text and the folder it lives in.
    pub fn from_json(text: &str, base_dir: &Path) -> Result<Self> {
        let document = SkinDocument::from_json(text)?;
        let name = base_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            base_dir: base_dir.to_path_buf(),
            document,
        })
    }

    /// Load a skin from the path of its description file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FoliumError::Skin(format!("{}: {e}", path.display())))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_json(&text, base_dir)
            .map_err(|e| FoliumError::Skin(format!("{}: {e}", path.display())))
    }

    pub fn core(&self) -> CoreId {
        self.document.core
    }

    /// Resolve an asset name relative to the skin folder.
    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }
}
