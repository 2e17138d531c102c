//! Layout resolution: skin + orientation + viewport -> concrete controls.

use std::path::PathBuf;

use folium_types::geometry::{Orientation, Rect, Viewport};
use folium_types::input::{LogicalButton, ThumbstickKind};
use folium_types::CoreId;

use crate::default;
use crate::document::{ControlStyle, Layout, Skin};

/// Blur applied behind `Blurred` controls, in points.
const BLUR_RADIUS: f64 = 12.0;
/// Outline width of `Bordered` controls, in points.
const BORDER_WIDTH: f64 = 2.0;

/// Pick the layout a skin provides for an orientation.
///
/// Portrait-upside-down falls back to portrait. Each landscape side falls
/// back to the other landscape side, then to portrait. Unknown orientations
/// are portrait. Because every skin carries a portrait layout this only
/// returns `None` for documents built by hand without one.
pub fn resolve(skin: &Skin, orientation: Orientation) -> Option<&Layout> {
    let o = &skin.document.orientations;
    let chain: &[Orientation] = match orientation {
        Orientation::Unknown | Orientation::Portrait => &[Orientation::Portrait],
        Orientation::PortraitUpsideDown => {
            &[Orientation::PortraitUpsideDown, Orientation::Portrait]
        },
        Orientation::LandscapeLeft => &[
            Orientation::LandscapeLeft,
            Orientation::LandscapeRight,
            Orientation::Portrait,
        ],
        Orientation::LandscapeRight => &[
            Orientation::LandscapeRight,
            Orientation::LandscapeLeft,
            Orientation::Portrait,
        ],
    };
    chain.iter().find_map(|&key| o.get(key))
}

/// How a control should be drawn, decided once when the layout is built.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDescriptor {
    pub style: ControlStyle,
    /// Skin-supplied artwork, already resolved against the skin folder.
    pub image: Option<PathBuf>,
    pub blur_radius: f64,
    pub border_width: f64,
    pub corner_radius: f64,
}

impl RenderDescriptor {
    pub fn new(style: ControlStyle, image: Option<PathBuf>, frame: Rect) -> Self {
        let (blur_radius, border_width) = match style {
            ControlStyle::Default => (0.0, 0.0),
            ControlStyle::Blurred => (BLUR_RADIUS, 0.0),
            ControlStyle::Bordered => (0.0, BORDER_WIDTH),
        };
        Self {
            style,
            image,
            blur_radius,
            border_width,
            corner_radius: frame.width.min(frame.height) / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedButton {
    pub kind: LogicalButton,
    pub frame: Rect,
    /// Effective opacity; 0 for transparent hit regions.
    pub alpha: f64,
    pub vibrate_on_tap: bool,
    pub render: RenderDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedThumbstick {
    pub kind: ThumbstickKind,
    pub frame: Rect,
    pub alpha: f64,
    pub vibrate_on_tap: bool,
    pub render: RenderDescriptor,
}

/// Where a resolved layout came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSource {
    Skin(String),
    Generated,
}

/// A layout bound to a viewport. Rebuilt on every rotation or skin change.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLayout {
    pub core: CoreId,
    pub orientation: Orientation,
    pub viewport: Viewport,
    pub buttons: Vec<ResolvedButton>,
    pub thumbsticks: Vec<ResolvedThumbstick>,
    pub screens: Vec<Rect>,
    pub background: Option<PathBuf>,
    pub debug_outlines: bool,
    pub source: LayoutSource,
}

impl ResolvedLayout {
    pub fn button(&self, kind: LogicalButton) -> Option<&ResolvedButton> {
        self.buttons.iter().find(|b| b.kind == kind)
    }
}

/// Bind a skin layout to a viewport.
///
/// Authored geometry is used as-is: skins are calibrated for the device
/// they were made on and are not rescaled.
pub fn materialize(
    skin: &Skin,
    layout: &Layout,
    orientation: Orientation,
    viewport: Viewport,
) -> ResolvedLayout {
    let shared = skin.document.shared_alpha;
    let image = |name: &Option<String>| name.as_deref().map(|n| skin.asset_path(n));

    let buttons = layout
        .buttons
        .iter()
        .map(|b| {
            let frame = b.frame();
            let alpha = if b.transparent {
                0.0
            } else {
                shared.or(b.alpha).unwrap_or(1.0)
            };
            ResolvedButton {
                kind: b.kind,
                frame,
                alpha,
                vibrate_on_tap: b.vibrate_on_tap,
                render: RenderDescriptor::new(b.style, image(&b.background_image_name), frame),
            }
        })
        .collect();

    let thumbsticks = layout
        .thumbsticks
        .iter()
        .map(|t| {
            let frame = t.frame();
            ResolvedThumbstick {
                kind: t.kind,
                frame,
                alpha: shared.or(t.alpha).unwrap_or(1.0),
                vibrate_on_tap: t.vibrate_on_tap,
                render: RenderDescriptor::new(t.style, image(&t.background_image_name), frame),
            }
        })
        .collect();

    ResolvedLayout {
        core: skin.core(),
        orientation,
        viewport,
        buttons,
        thumbsticks,
        screens: layout.screens.iter().map(|s| s.frame()).collect(),
        background: image(&layout.background_image_name),
        debug_outlines: skin.document.debugging,
        source: LayoutSource::Skin(skin.name.clone()),
    }
}

/// Produce the layout a session should show.
///
/// Uses the skin when it targets `core` and has a layout for the
/// orientation; otherwise generates the built-in default so emulation can
/// always start with some controls. `viewport` is the portrait viewport; it
/// is rotated to match `orientation`.
pub fn resolve_for_session(
    skin: Option<&Skin>,
    core: CoreId,
    orientation: Orientation,
    viewport: Viewport,
) -> ResolvedLayout {
    let viewport = viewport.oriented(orientation);
    if let Some(skin) = skin {
        if skin.core() != core {
            log::warn!(
                "Skin '{}' targets {}, not {core} -- using default layout",
                skin.name,
                skin.core()
            );
        } else if let Some(layout) = resolve(skin, orientation) {
            return materialize(skin, layout, orientation, viewport);
        } else {
            log::warn!("Skin '{}' has no usable layout -- using default", skin.name);
        }
    }
    default::generate(core, orientation, viewport)
}
