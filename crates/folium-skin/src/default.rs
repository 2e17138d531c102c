//! Built-in layouts generated from the live viewport.
//!
//! Used whenever no skin is available for the running core. Unlike skins,
//! these compute geometry from the current screen bounds and safe area, so
//! they fit any device. Sizes come from one of two buckets: compact for
//! `DeviceClass::Mini` and a generic bucket shared by phones and tablets.

use folium_types::geometry::{DeviceClass, Orientation, Point, Rect, Viewport};
use folium_types::input::{LogicalButton, ThumbstickKind};
use folium_types::CoreId;

use crate::document::ControlStyle;
use crate::resolver::{
    LayoutSource, RenderDescriptor, ResolvedButton, ResolvedLayout, ResolvedThumbstick,
};

/// Control sizing for one device bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Metrics {
    /// Face / d-pad button side.
    button: f64,
    /// Gap between clustered buttons.
    spacing: f64,
    /// Distance kept from the safe-area edge.
    margin: f64,
    /// Maximum share of the safe height given to screens in portrait.
    screen_share: f64,
}

fn metrics(device: DeviceClass) -> Metrics {
    match device {
        DeviceClass::Mini => Metrics {
            button: 44.0,
            spacing: 6.0,
            margin: 14.0,
            screen_share: 0.5,
        },
        DeviceClass::Standard | DeviceClass::Pad => Metrics {
            button: 52.0,
            spacing: 8.0,
            margin: 20.0,
            screen_share: 0.55,
        },
    }
}

/// What a core's default pad looks like.
struct PadShape {
    face: &'static [LogicalButton],
    shoulders: &'static [LogicalButton],
    home: bool,
    thumbsticks: &'static [ThumbstickKind],
}

fn pad_shape(core: CoreId) -> PadShape {
    use LogicalButton::*;
    match core {
        CoreId::Cytrus => PadShape {
            face: &[A, B, X, Y],
            shoulders: &[L, R, ZL, ZR],
            home: true,
            thumbsticks: &[ThumbstickKind::Left],
        },
        CoreId::Lychee => PadShape {
            face: &[A, B, X, Y],
            shoulders: &[L, R, ZL, ZR],
            home: false,
            thumbsticks: &[],
        },
        CoreId::Grape | CoreId::Mango => PadShape {
            face: &[A, B, X, Y],
            shoulders: &[L, R],
            home: false,
            thumbsticks: &[],
        },
        CoreId::Tomato => PadShape {
            face: &[A, B],
            shoulders: &[L, R],
            home: false,
            thumbsticks: &[],
        },
        CoreId::Kiwi | CoreId::Peach => PadShape {
            face: &[A, B],
            shoulders: &[],
            home: false,
            thumbsticks: &[],
        },
    }
}

/// Generate the default layout for `core` in an already-oriented viewport.
pub fn generate(core: CoreId, orientation: Orientation, viewport: Viewport) -> ResolvedLayout {
    let m = metrics(viewport.device);
    let shape = pad_shape(core);
    let safe = viewport.safe_rect();
    let mut out = Builder::default();

    let controls_top = if orientation.is_landscape() {
        let side = 3.0 * m.button + 2.0 * m.spacing + 2.0 * m.margin;
        let width = (safe.width - 2.0 * side).max(0.0);
        let area = Rect::new(safe.x + side, safe.y, width, safe.height);
        out.screens = fit_screens(core, area);
        safe.y + m.margin
    } else {
        let area = Rect::new(safe.x, safe.y, safe.width, safe.height * m.screen_share);
        out.screens = fit_screens(core, area);
        out.screens
            .last()
            .map_or(safe.y, |s| s.max_y())
            + m.margin
    };

    let s = m.button;
    let cluster = 3.0 * s;
    let small = Rect::new(0.0, 0.0, s * 1.2, s * 0.6);
    let bottom = safe.max_y() - m.margin;
    let left_x = safe.x + m.margin;
    let right_x = safe.max_x() - m.margin;

    // System button row along the bottom edge.
    let row_y = bottom - small.height;
    let cluster_bottom = row_y - m.spacing;
    let dpad_center = Point::new(left_x + cluster / 2.0, cluster_bottom - cluster / 2.0);
    let face_center = Point::new(right_x - cluster / 2.0, cluster_bottom - cluster / 2.0);

    use LogicalButton::*;
    out.diamond(dpad_center, s, [Up, Right, Down, Left]);
    match shape.face {
        [a, b, x, y] => out.diamond(face_center, s, [*x, *a, *b, *y]),
        faces => {
            // Two-button pads sit on a diagonal, B lower-left of A.
            for (i, kind) in faces.iter().enumerate() {
                let dx = if i == 0 { s * 0.6 } else { -s * 0.6 };
                let dy = if i == 0 { -s * 0.4 } else { s * 0.4 };
                let center = Point::new(face_center.x + dx, face_center.y + dy);
                out.button(*kind, square(center, s));
            }
        },
    }

    let mid_x = safe.center().x;
    let shoulder = Rect::new(0.0, 0.0, s * 1.4, s * 0.7);
    let shoulder_y = controls_top.min(cluster_bottom - cluster - shoulder.height - m.spacing);
    let small_at = |x: f64, y: f64| Rect::new(x, y, small.width, small.height);
    if orientation.is_landscape() {
        // The screens own the middle; system buttons go under the clusters.
        out.button(Settings, small_at(left_x, row_y));
        out.button(Minus, small_at(left_x + cluster - small.width, row_y));
        out.button(Plus, small_at(right_x - cluster, row_y));
        if shape.home {
            out.button(Home, small_at(right_x - small.width, row_y));
        }
    } else {
        out.button(Minus, small_at(mid_x - m.spacing / 2.0 - small.width, row_y));
        out.button(Plus, small_at(mid_x + m.spacing / 2.0, row_y));
        let settings_y = row_y - small.height - m.spacing;
        out.button(Settings, small_at(mid_x - small.width / 2.0, settings_y));
        if shape.home {
            let home_y = shoulder_y + shoulder.height + m.spacing;
            out.button(Home, small_at(mid_x - small.width / 2.0, home_y));
        }
    }

    // Shoulders hug the top of the control area.
    for kind in shape.shoulders {
        let (x, y) = match kind {
            L => (left_x, shoulder_y),
            R => (right_x - shoulder.width, shoulder_y),
            ZL => (left_x + shoulder.width + m.spacing, shoulder_y),
            ZR => (right_x - 2.0 * shoulder.width - m.spacing, shoulder_y),
            _ => continue,
        };
        out.button(*kind, Rect::new(x, y, shoulder.width, shoulder.height));
    }

    // Sticks fill the gap between the shoulder row and the clusters below.
    let stick_top = shoulder_y + shoulder.height + m.spacing;
    let stick_bottom = cluster_bottom - cluster - m.spacing;
    let size = (cluster * 0.8).min(stick_bottom - stick_top);
    for kind in shape.thumbsticks {
        if size < s {
            log::warn!("No room for the {kind:?} thumbstick on {core} ({size:.0}pt gap)");
            continue;
        }
        let x = match kind {
            ThumbstickKind::Left => dpad_center.x,
            ThumbstickKind::Right => face_center.x,
        };
        let frame = square(Point::new(x, (stick_top + stick_bottom) / 2.0), size);
        out.thumbsticks.push(ResolvedThumbstick {
            kind: *kind,
            frame,
            alpha: 1.0,
            vibrate_on_tap: false,
            render: RenderDescriptor::new(ControlStyle::Default, None, frame),
        });
    }

    ResolvedLayout {
        core,
        orientation,
        viewport,
        buttons: out.buttons,
        thumbsticks: out.thumbsticks,
        screens: out.screens,
        background: None,
        debug_outlines: false,
        source: LayoutSource::Generated,
    }
}

#[derive(Default)]
struct Builder {
    buttons: Vec<ResolvedButton>,
    thumbsticks: Vec<ResolvedThumbstick>,
    screens: Vec<Rect>,
}

impl Builder {
    fn button(&mut self, kind: LogicalButton, frame: Rect) {
        self.buttons.push(ResolvedButton {
            kind,
            frame,
            alpha: 1.0,
            vibrate_on_tap: true,
            render: RenderDescriptor::new(ControlStyle::Default, None, frame),
        });
    }

    /// Four buttons around `center`: top, right, bottom, left.
    fn diamond(&mut self, center: Point, side: f64, kinds: [LogicalButton; 4]) {
        let offsets = [(0.0, -side), (side, 0.0), (0.0, side), (-side, 0.0)];
        for (kind, (dx, dy)) in kinds.into_iter().zip(offsets) {
            self.button(kind, square(Point::new(center.x + dx, center.y + dy), side));
        }
    }
}

fn square(center: Point, side: f64) -> Rect {
    Rect::new(center.x - side / 2.0, center.y - side / 2.0, side, side)
}

/// Stack the core's screens vertically inside `area`, preserving the
/// native aspect ratio and centring horizontally.
fn fit_screens(core: CoreId, area: Rect) -> Vec<Rect> {
    let native = core.native_screens();
    let max_w = native.iter().map(|&(w, _)| w).max().unwrap_or(1) as f64;
    let total_h: f64 = native.iter().map(|&(_, h)| h as f64).sum();
    if area.width <= 0.0 || area.height <= 0.0 || total_h <= 0.0 {
        return Vec::new();
    }
    let scale = (area.width / max_w).min(area.height / total_h);
    let mut y = area.y;
    native
        .iter()
        .map(|&(w, h)| {
            let (w, h) = (w as f64 * scale, h as f64 * scale);
            let r = Rect::new(area.x + (area.width - w) / 2.0, y, w, h);
            y += h;
            r
        })
        .collect()
}
