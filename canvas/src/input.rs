//! Drag and hover model for the map view.
//!
//! `DragState` is the control captured between pointer-down and pointer-up.
//! The free functions turn a pointer position (virtual units) into visual
//! field degrees and from there into clamped anatomical parameters. Hover is
//! resolved separately and only ever produces a highlighted sector.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{DOT_RADIUS, FIELD_CX, FIELD_CY, KEY_RADIUS, RAPHE_LENGTH_DEG, UNITS_PER_DEG};
use crate::hit::{Nearest, RegionLabel};
use crate::params::{AnatomicalParameters, Param, clamp_degrees};
use crate::viewport::{Point, Viewport};

/// Which anatomical control the pointer has captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// Nothing captured; pointer movement only hovers.
    #[default]
    None,
    /// Moving the blind-spot marker in both axes.
    DragOnh,
    /// Moving the ONH x handle; onhy is left alone.
    DragOnhX,
    /// Moving the ONH y handle; onhx is left alone.
    DragOnhY,
    /// Rotating the raphe about fixation.
    DragRaphe,
}

impl DragState {
    /// The drag started by pressing on `label`.
    #[must_use]
    pub fn from_label(label: Option<RegionLabel>) -> Self {
        match label {
            Some(RegionLabel::RapheEnd) => Self::DragRaphe,
            Some(RegionLabel::Onh) => Self::DragOnh,
            Some(RegionLabel::OnhX) => Self::DragOnhX,
            Some(RegionLabel::OnhY) => Self::DragOnhY,
            Some(RegionLabel::Location(_) | RegionLabel::KeyWedge(_)) | None => Self::None,
        }
    }

    #[must_use]
    pub fn is_dragging(self) -> bool {
        self != Self::None
    }
}

// =============================================================
// Field coordinates
// =============================================================

/// Pointer position (virtual units) as `(x, y)` degrees from fixation.
///
/// y grows downward, as on the canvas.
#[must_use]
pub fn field_degrees(virt: Point) -> (f64, f64) {
    ((virt.x - FIELD_CX) / UNITS_PER_DEG, (virt.y - FIELD_CY) / UNITS_PER_DEG)
}

/// Inverse of [`field_degrees`].
#[must_use]
pub fn field_point(x_deg: f64, y_deg: f64) -> Point {
    Point::new(FIELD_CX + x_deg * UNITS_PER_DEG, FIELD_CY + y_deg * UNITS_PER_DEG)
}

/// Where the blind-spot marker is drawn, in virtual units.
#[must_use]
pub fn onh_point(params: &AnatomicalParameters) -> Point {
    field_point(f64::from(params.display_onhx()), f64::from(params.onhy))
}

/// Raphe angle implied by a pointer at `virt`, clamped.
///
/// `None` when the pointer sits on fixation or the position is not finite.
#[must_use]
pub fn raphe_from_pointer(params: &AnatomicalParameters, virt: Point) -> Option<i32> {
    let (x_deg, y_deg) = field_degrees(virt);
    if x_deg == 0.0 && y_deg == 0.0 {
        return None;
    }
    let angle = y_deg.atan2(params.eye.mirror() * x_deg);
    // Keep the difference on the same turn as the raphe range.
    let diff = (angle - params.fodi() + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU) - std::f64::consts::PI;
    clamp_degrees(Param::Raphe, 180.0 - diff.to_degrees())
}

/// Free end of the raphe line, in virtual units.
#[must_use]
pub fn raphe_end(params: &AnatomicalParameters) -> Point {
    let angle = params.fodi() + (180.0 - f64::from(params.raphe)).to_radians();
    field_point(params.eye.mirror() * RAPHE_LENGTH_DEG * angle.cos(), RAPHE_LENGTH_DEG * angle.sin())
}

/// Apply a pointer position to the captured control.
///
/// Returns `true` if any parameter changed.
pub fn apply_drag(state: DragState, params: &mut AnatomicalParameters, virt: Point) -> bool {
    let before = *params;
    let (x_deg, y_deg) = field_degrees(virt);
    let stored_x = params.eye.mirror() * x_deg;
    match state {
        DragState::None => {}
        DragState::DragOnh => {
            if let (Some(x), Some(y)) = (clamp_degrees(Param::Onhx, stored_x), clamp_degrees(Param::Onhy, y_deg)) {
                params.onhx = x;
                params.onhy = y;
            }
        }
        DragState::DragOnhX => {
            if let Some(x) = clamp_degrees(Param::Onhx, stored_x) {
                params.onhx = x;
            }
        }
        DragState::DragOnhY => {
            if let Some(y) = clamp_degrees(Param::Onhy, y_deg) {
                params.onhy = y;
            }
        }
        DragState::DragRaphe => {
            if let Some(r) = raphe_from_pointer(params, virt) {
                params.raphe = r;
            }
        }
    }
    *params != before
}

// =============================================================
// Hover
// =============================================================

/// Sector to highlight for a hover result, in device pixels.
///
/// A test location highlights its own sector when the pointer is within a dot
/// radius; a key wedge highlights when within the key radius. `sectors` is
/// empty when no table row is available.
#[must_use]
pub fn hover_sector(hit: Nearest, sectors: &[u8], viewport: &Viewport) -> Option<u8> {
    let dot_r = viewport.scale(DOT_RADIUS);
    let key_r = viewport.scale(KEY_RADIUS);
    match hit.label? {
        RegionLabel::Location(i) => hit.within(dot_r * dot_r).and_then(|_| sectors.get(i).copied()),
        RegionLabel::KeyWedge(sector) => hit.within(key_r * key_r).map(|_| sector),
        RegionLabel::RapheEnd | RegionLabel::Onh | RegionLabel::OnhX | RegionLabel::OnhY => None,
    }
}
