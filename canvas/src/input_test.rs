#![allow(clippy::float_cmp)]

use super::*;
use crate::params::Eye;

fn params(eye: Eye, onhx: i32, onhy: i32, raphe: i32) -> AnatomicalParameters {
    AnatomicalParameters::new(eye, onhx, onhy, raphe)
}

fn polar(x_sign: f64, deg: f64, r: f64) -> Point {
    let a = deg.to_radians();
    field_point(x_sign * r * a.cos(), r * a.sin())
}

// =============================================================
// DragState
// =============================================================

#[test]
fn drag_state_default_is_none() {
    assert_eq!(DragState::default(), DragState::None);
    assert!(!DragState::default().is_dragging());
}

#[test]
fn drag_state_from_control_labels() {
    assert_eq!(DragState::from_label(Some(RegionLabel::RapheEnd)), DragState::DragRaphe);
    assert_eq!(DragState::from_label(Some(RegionLabel::Onh)), DragState::DragOnh);
    assert_eq!(DragState::from_label(Some(RegionLabel::OnhX)), DragState::DragOnhX);
    assert_eq!(DragState::from_label(Some(RegionLabel::OnhY)), DragState::DragOnhY);
}

#[test]
fn drag_state_from_passive_labels_is_none() {
    assert_eq!(DragState::from_label(Some(RegionLabel::Location(4))), DragState::None);
    assert_eq!(DragState::from_label(Some(RegionLabel::KeyWedge(1))), DragState::None);
    assert_eq!(DragState::from_label(None), DragState::None);
}

// =============================================================
// Field coordinates
// =============================================================

#[test]
fn fixation_is_origin() {
    assert_eq!(field_degrees(Point::new(FIELD_CX, FIELD_CY)), (0.0, 0.0));
    assert_eq!(field_point(0.0, 0.0), Point::new(FIELD_CX, FIELD_CY));
}

#[test]
fn field_degrees_inverts_field_point() {
    let p = field_point(-12.5, 7.0);
    let (x, y) = field_degrees(p);
    assert!((x + 12.5).abs() < 1e-9);
    assert!((y - 7.0).abs() < 1e-9);
}

#[test]
fn onh_point_mirrors_for_right_eye() {
    let left = onh_point(&params(Eye::Left, -15, 2, 170));
    let right = onh_point(&params(Eye::Right, -15, 2, 170));
    assert_eq!(left, field_point(-15.0, 2.0));
    assert_eq!(right, field_point(15.0, 2.0));
}

// =============================================================
// Raphe
// =============================================================

#[test]
fn raphe_end_is_thirty_degrees_out() {
    let p = params(Eye::Right, -15, 2, 170);
    let (x, y) = field_degrees(raphe_end(&p));
    assert!((x.hypot(y) - RAPHE_LENGTH_DEG).abs() < 1e-9);
    // Right eye: the raphe points to the temporal (left) side on screen.
    assert!(x < 0.0);
}

#[test]
fn raphe_from_pointer_inverts_raphe_end() {
    for eye in [Eye::Left, Eye::Right] {
        for (onhx, onhy) in [(-15, 2), (-18, -2), (-12, 4), (-14, 0)] {
            for raphe in 161..=181 {
                let p = params(eye, onhx, onhy, raphe);
                assert_eq!(raphe_from_pointer(&p, raphe_end(&p)), Some(raphe), "{eye:?} {onhx} {onhy} {raphe}");
            }
        }
    }
}

#[test]
fn raphe_from_pointer_level_disc() {
    // onhy = 0 puts the disc on the horizontal, so fodi is zero.
    let left = params(Eye::Left, -15, 0, 170);
    assert_eq!(raphe_from_pointer(&left, polar(1.0, 5.0, 30.0)), Some(175));
    let right = params(Eye::Right, -15, 0, 170);
    assert_eq!(raphe_from_pointer(&right, polar(-1.0, 5.0, 30.0)), Some(175));
}

#[test]
fn raphe_from_pointer_clamps() {
    let p = params(Eye::Left, -15, 0, 170);
    assert_eq!(raphe_from_pointer(&p, polar(1.0, 90.0, 20.0)), Some(161));
    assert_eq!(raphe_from_pointer(&p, polar(1.0, -10.0, 20.0)), Some(181));
}

#[test]
fn raphe_from_pointer_on_fixation_is_none() {
    let p = AnatomicalParameters::default();
    assert_eq!(raphe_from_pointer(&p, field_point(0.0, 0.0)), None);
    assert_eq!(raphe_from_pointer(&p, Point::new(f64::NAN, 10.0)), None);
}

// =============================================================
// apply_drag
// =============================================================

#[test]
fn drag_onh_moves_both_axes() {
    let mut p = AnatomicalParameters::default();
    let at = field_point(13.0, -1.0);
    assert!(apply_drag(DragState::DragOnh, &mut p, at));
    assert_eq!((p.onhx, p.onhy, p.raphe), (-13, -1, 170));
    assert_eq!(onh_point(&p), at);
}

#[test]
fn drag_onh_clamps() {
    let mut p = params(Eye::Left, -15, 2, 170);
    apply_drag(DragState::DragOnh, &mut p, field_point(-40.0, 40.0));
    assert_eq!((p.onhx, p.onhy), (-18, 4));
    apply_drag(DragState::DragOnh, &mut p, field_point(0.0, -40.0));
    assert_eq!((p.onhx, p.onhy), (-12, -2));
}

#[test]
fn drag_onh_x_leaves_y() {
    let mut p = AnatomicalParameters::default();
    assert!(apply_drag(DragState::DragOnhX, &mut p, field_point(16.4, 3.0)));
    assert_eq!((p.onhx, p.onhy), (-16, 2));
}

#[test]
fn drag_onh_y_leaves_x() {
    let mut p = AnatomicalParameters::default();
    assert!(apply_drag(DragState::DragOnhY, &mut p, field_point(0.0, 3.6)));
    assert_eq!((p.onhx, p.onhy), (-15, 4));
    apply_drag(DragState::DragOnhY, &mut p, field_point(-30.0, 40.0));
    assert_eq!((p.onhx, p.onhy), (-15, 4));
}

#[test]
fn drag_raphe_changes_only_raphe() {
    let mut p = params(Eye::Left, -15, 0, 170);
    assert!(apply_drag(DragState::DragRaphe, &mut p, polar(1.0, 5.0, 25.0)));
    assert_eq!(p, params(Eye::Left, -15, 0, 175));
}

#[test]
fn drag_onh_rounds_half_degrees_up() {
    // Right eye: screen x 15.5 is stored as -15.5.
    let mut p = AnatomicalParameters::default();
    apply_drag(DragState::DragOnh, &mut p, field_point(15.5, 2.5));
    assert_eq!((p.onhx, p.onhy), (-15, 3));

    let mut left = params(Eye::Left, -17, 2, 170);
    apply_drag(DragState::DragOnhX, &mut left, field_point(-16.5, 0.0));
    assert_eq!(left.onhx, -16);
}

#[test]
fn drag_none_changes_nothing() {
    let mut p = AnatomicalParameters::default();
    assert!(!apply_drag(DragState::None, &mut p, field_point(13.0, -1.0)));
    assert_eq!(p, AnatomicalParameters::default());
}

#[test]
fn drag_same_cell_reports_unchanged() {
    let mut p = AnatomicalParameters::default();
    assert!(!apply_drag(DragState::DragOnh, &mut p, field_point(15.2, 1.9)));
}

#[test]
fn drag_non_finite_pointer_is_ignored() {
    let mut p = AnatomicalParameters::default();
    assert!(!apply_drag(DragState::DragOnh, &mut p, Point::new(f64::NAN, f64::NAN)));
    assert!(!apply_drag(DragState::DragOnhX, &mut p, Point::new(f64::INFINITY, 0.0)));
    assert_eq!(p, AnatomicalParameters::default());
}

// =============================================================
// hover_sector
// =============================================================

#[test]
fn hover_location_within_dot_radius() {
    let vp = Viewport::default();
    let hit = Nearest { label: Some(RegionLabel::Location(2)), dist_sq: 100.0 };
    assert_eq!(hover_sector(hit, &[0, 5, 7], &vp), Some(7));
}

#[test]
fn hover_location_outside_dot_radius() {
    let vp = Viewport::default();
    let r = vp.scale(DOT_RADIUS);
    let hit = Nearest { label: Some(RegionLabel::Location(0)), dist_sq: r * r + 1.0 };
    assert_eq!(hover_sector(hit, &[3], &vp), None);
}

#[test]
fn hover_location_without_sectors() {
    let vp = Viewport::default();
    let hit = Nearest { label: Some(RegionLabel::Location(0)), dist_sq: 0.0 };
    assert_eq!(hover_sector(hit, &[], &vp), None);
    let past_end = Nearest { label: Some(RegionLabel::Location(5)), dist_sq: 0.0 };
    assert_eq!(hover_sector(past_end, &[1, 2], &vp), None);
}

#[test]
fn hover_key_wedge_uses_key_radius() {
    let vp = Viewport::default();
    let hit = Nearest { label: Some(RegionLabel::KeyWedge(3)), dist_sq: 1000.0 };
    assert_eq!(hover_sector(hit, &[], &vp), Some(3));
    let r = vp.scale(KEY_RADIUS);
    let far = Nearest { label: Some(RegionLabel::KeyWedge(3)), dist_sq: r * r + 1.0 };
    assert_eq!(hover_sector(far, &[], &vp), None);
}

#[test]
fn hover_controls_and_sentinel_highlight_nothing() {
    let vp = Viewport::default();
    let hit = Nearest { label: Some(RegionLabel::RapheEnd), dist_sq: 0.0 };
    assert_eq!(hover_sector(hit, &[1], &vp), None);
    assert_eq!(hover_sector(Nearest::NONE, &[1], &vp), None);
}
