//! Frame layout: everything one redraw puts on screen, in virtual units.
//!
//! The renderer paints a [`FrameLayout`] and the engine derives the frame's
//! [`InteractiveRegion`]s from the same value, so what can be hit is always
//! what was drawn.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::calibration::CalibrationStep;
use crate::consts::{
    DOT_RADIUS, FIELD_CX, FIELD_CY, KEY_ANCHOR_FRACTION, KEY_CX, KEY_CY, KEY_EXPLODE, KEY_RADIUS, KEY_Y_STRETCH,
    ONH_MARKER_SCALE, TICK_LIMIT_DEG, TICK_STEP_DEG, UNITS_PER_DEG, UNKNOWN_SECTOR_COLOR, VIRTUAL_H, VIRTUAL_W,
    X_AXIS_OFFSET_DEG, Y_AXIS_X, Y_TICK_LIMIT_DEG,
};
use crate::hit::{InteractiveRegion, RegionLabel};
use crate::input::{field_point, onh_point, raphe_end};
use crate::params::{AnatomicalParameters, Eye};
use crate::pattern::{Partition, TestPattern, Wedge};
use crate::viewport::{Point, Viewport};

const TICK_LEN: f64 = 5.0;
const KEY_LABEL_GAP: f64 = 14.0;

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    /// Value for the canvas `textAlign` property.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub at: Point,
    pub align: Align,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// One test location.
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub center: Point,
    /// Sector from the table, if the lookup succeeded.
    pub sector: Option<u8>,
    pub color: &'static str,
    /// Belongs to the hovered sector.
    pub highlighted: bool,
}

/// One wedge of the TSNIT key pie.
///
/// Angles are mathematical (counter-clockwise from +x, y up) and the sweep
/// runs from `start_rad` up to `end_rad`. The pie is stretched vertically by
/// [`KEY_Y_STRETCH`] about `apex`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyWedge {
    pub sector: u8,
    pub apex: Point,
    pub start_rad: f64,
    pub end_rad: f64,
    pub color: &'static str,
    pub exploded: bool,
    /// Hit anchor inside the wedge.
    pub anchor: Point,
}

/// The sector map view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout {
    pub dots: Vec<Dot>,
    pub onh: Point,
    pub onh_radius: f64,
    pub fixation: Point,
    pub raphe_end: Point,
    pub onhx_handle: Point,
    pub onhy_handle: Point,
    pub axes: Vec<Segment>,
    pub ticks: Vec<Segment>,
    pub labels: Vec<Label>,
    pub key: Vec<KeyWedge>,
}

/// The calibration view.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationLayout {
    /// Whether the image is decoded and can be drawn.
    pub image_ready: bool,
    /// Landmarks of the current click cycle, in virtual units.
    pub markers: Vec<Point>,
    pub prompt: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameLayout {
    Map(MapLayout),
    Calibration(CalibrationLayout),
}

impl FrameLayout {
    /// Anchors for this frame, in device pixels.
    #[must_use]
    pub fn regions(&self, viewport: &Viewport) -> Vec<InteractiveRegion> {
        match self {
            Self::Map(map) => map.regions(viewport),
            Self::Calibration(_) => Vec::new(),
        }
    }
}

// =============================================================
// Map
// =============================================================

/// Key-pie angle (degrees) for a TSNIT angle.
///
/// Temporal faces fixation, so it points right for a left eye and left for a
/// right eye.
fn key_angle(eye: Eye, tsnit_deg: f64) -> f64 {
    match eye {
        Eye::Left => tsnit_deg,
        Eye::Right => 180.0 - tsnit_deg,
    }
}

fn key_wedge(eye: Eye, sector: u8, wedge: Wedge, color: &'static str, exploded: bool) -> KeyWedge {
    let a = key_angle(eye, wedge.start_deg);
    let b = key_angle(eye, wedge.start_deg + wedge.span());
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    let mid = key_angle(eye, wedge.mid_deg()).to_radians();
    let push = if exploded { KEY_EXPLODE } else { 0.0 };
    let apex = Point::new(KEY_CX + push * mid.cos(), KEY_CY - push * mid.sin());
    let reach = KEY_ANCHOR_FRACTION * KEY_RADIUS;
    let anchor = Point::new(apex.x + reach * mid.cos(), apex.y - reach * mid.sin() * KEY_Y_STRETCH);
    KeyWedge { sector, apex, start_rad: start.to_radians(), end_rad: end.to_radians(), color, exploded, anchor }
}

fn axes_and_ticks() -> (Vec<Segment>, Vec<Segment>, Vec<Label>) {
    let x_axis_y = FIELD_CY + X_AXIS_OFFSET_DEG * UNITS_PER_DEG;
    let x_lim = f64::from(TICK_LIMIT_DEG);
    let y_lim = f64::from(Y_TICK_LIMIT_DEG) * UNITS_PER_DEG;
    let axes = vec![
        Segment {
            from: Point::new(FIELD_CX - x_lim * UNITS_PER_DEG, x_axis_y),
            to: Point::new(FIELD_CX + x_lim * UNITS_PER_DEG, x_axis_y),
        },
        Segment { from: Point::new(Y_AXIS_X, FIELD_CY - y_lim), to: Point::new(Y_AXIS_X, FIELD_CY + y_lim) },
    ];

    let mut ticks = Vec::new();
    let mut labels = Vec::new();
    for i in (-TICK_LIMIT_DEG..=TICK_LIMIT_DEG).step_by(TICK_STEP_DEG) {
        let x = FIELD_CX + f64::from(i) * UNITS_PER_DEG;
        ticks.push(Segment { from: Point::new(x, x_axis_y), to: Point::new(x, x_axis_y + TICK_LEN) });
        labels.push(Label {
            text: i.to_string(),
            at: Point::new(x, x_axis_y + 2.2 * UNITS_PER_DEG),
            align: Align::Center,
        });
    }
    for i in (-Y_TICK_LIMIT_DEG..=Y_TICK_LIMIT_DEG).step_by(TICK_STEP_DEG) {
        let y = FIELD_CY - f64::from(i) * UNITS_PER_DEG;
        ticks.push(Segment { from: Point::new(Y_AXIS_X - TICK_LEN, y), to: Point::new(Y_AXIS_X, y) });
        labels.push(Label { text: i.to_string(), at: Point::new(Y_AXIS_X / 1.2, y), align: Align::Right });
    }
    (axes, ticks, labels)
}

fn key_labels(eye: Eye) -> Vec<Label> {
    let side = KEY_RADIUS + KEY_LABEL_GAP;
    let tall = KEY_RADIUS * KEY_Y_STRETCH + KEY_LABEL_GAP;
    let t_dir = eye.mirror();
    let label = |text: &str, x: f64, y: f64| Label { text: text.to_owned(), at: Point::new(x, y), align: Align::Center };
    vec![
        label("T", KEY_CX + t_dir * side, KEY_CY),
        label("N", KEY_CX - t_dir * side, KEY_CY),
        label("S", KEY_CX, KEY_CY - tall),
        label("I", KEY_CX, KEY_CY + tall),
    ]
}

impl MapLayout {
    /// Lay out the map for `params`.
    ///
    /// `sectors` is the table row for `params` (one entry per grid location);
    /// with `None` every dot is drawn in the neutral colour. `hover` is the
    /// sector to highlight.
    #[must_use]
    pub fn build(
        params: &AnatomicalParameters,
        sectors: Option<&[u8]>,
        pattern: TestPattern,
        partition: Partition,
        hover: Option<u8>,
    ) -> Self {
        let mirror = params.eye.mirror();
        let dots = pattern
            .grid()
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let sector = sectors.and_then(|s| s.get(i).copied());
                Dot {
                    center: field_point(mirror * x, -y),
                    sector,
                    color: sector.and_then(|s| partition.color(s)).unwrap_or(UNKNOWN_SECTOR_COLOR),
                    highlighted: hover.is_some() && sector == hover,
                }
            })
            .collect();

        let key = partition
            .wedges()
            .into_iter()
            .zip(0_u8..)
            .map(|(wedge, sector)| {
                let color = partition.color(sector).unwrap_or(UNKNOWN_SECTOR_COLOR);
                key_wedge(params.eye, sector, wedge, color, hover == Some(sector))
            })
            .collect();

        let (axes, ticks, mut labels) = axes_and_ticks();
        labels.extend(key_labels(params.eye));

        let onh = onh_point(params);
        Self {
            dots,
            onh,
            onh_radius: DOT_RADIUS * ONH_MARKER_SCALE,
            fixation: field_point(0.0, 0.0),
            raphe_end: raphe_end(params),
            onhx_handle: Point::new(onh.x, FIELD_CY + X_AXIS_OFFSET_DEG * UNITS_PER_DEG),
            onhy_handle: Point::new(Y_AXIS_X, onh.y),
            axes,
            ticks,
            labels,
            key,
        }
    }

    /// Anchors in device pixels. Controls come first so they win ties.
    #[must_use]
    pub fn regions(&self, viewport: &Viewport) -> Vec<InteractiveRegion> {
        let at = |p: Point, label: RegionLabel| InteractiveRegion { pos: viewport.to_device(p), label };
        let mut regions = Vec::with_capacity(4 + self.dots.len() + self.key.len());
        regions.push(at(self.raphe_end, RegionLabel::RapheEnd));
        regions.push(at(self.onh, RegionLabel::Onh));
        regions.push(at(self.onhx_handle, RegionLabel::OnhX));
        regions.push(at(self.onhy_handle, RegionLabel::OnhY));
        regions.extend(self.dots.iter().enumerate().map(|(i, d)| at(d.center, RegionLabel::Location(i))));
        regions.extend(self.key.iter().map(|w| at(w.anchor, RegionLabel::KeyWedge(w.sector))));
        regions
    }
}

// =============================================================
// Calibration
// =============================================================

/// Prompt shown before an image has been loaded.
pub const NO_IMAGE_PROMPT: &str = "Choose a fundus or OCT image to calibrate";

impl CalibrationLayout {
    /// Lay out the calibration view.
    ///
    /// `image_size` is the decoded image's natural size; landmarks are held in
    /// image pixels and stretched onto the full virtual canvas like the image.
    #[must_use]
    pub fn build(image_size: Option<(f64, f64)>, landmarks: &[Point], step: CalibrationStep) -> Self {
        match image_size {
            Some(size) => Self {
                image_ready: true,
                markers: landmarks.iter().map(|&p| image_to_virtual(p, size)).collect(),
                prompt: step.prompt(),
            },
            None => Self { image_ready: false, markers: Vec::new(), prompt: NO_IMAGE_PROMPT },
        }
    }
}

/// Image pixel to virtual units, with the image filling the canvas.
#[must_use]
pub fn image_to_virtual(p: Point, (w, h): (f64, f64)) -> Point {
    Point::new(p.x / w * VIRTUAL_W, p.y / h * VIRTUAL_H)
}

/// Virtual units to image pixels.
#[must_use]
pub fn virtual_to_image(p: Point, (w, h): (f64, f64)) -> Point {
    Point::new(p.x / VIRTUAL_W * w, p.y / VIRTUAL_H * h)
}
