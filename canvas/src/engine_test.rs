#![allow(clippy::float_cmp)]

use super::*;
use crate::calibration::CalibrationStep;
use crate::hit::RegionLabel;
use crate::input::{field_point, raphe_end};
use crate::params::Eye;
use crate::pattern::{Partition, TestPattern};
use crate::sector::{CELLS_PER_LAYER, LayerAsset, TABLE_VERSION, TableAsset};
use crate::ui_port::MemoryPort;

// =============================================================
// Helpers
// =============================================================

fn table() -> SectorTable {
    let pattern = TestPattern::P24_2;
    let partition = Partition::Thirty;
    let cells = (0..CELLS_PER_LAYER)
        .map(|cell| (0..pattern.location_count()).map(|loc| u8::try_from((cell + loc) % 12).unwrap()).collect())
        .collect();
    SectorTable::from_asset(TableAsset { version: TABLE_VERSION, layers: vec![LayerAsset { pattern, partition, cells }] })
        .unwrap()
}

/// A view model with one frame committed, as after the first render.
fn vm() -> ViewModel {
    let mut vm = ViewModel::new(table(), MapConfig::default());
    vm.commit_frame();
    vm
}

fn anchor(vm: &ViewModel, label: RegionLabel) -> Point {
    vm.regions.iter().find(|r| r.label == label).map(|r| r.pos).unwrap()
}

fn device(vm: &ViewModel, virt: Point) -> Point {
    vm.viewport.to_device(virt)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Calibration mode with a decoded image the size of the virtual canvas.
fn calibrating() -> ViewModel {
    let mut vm = vm();
    let (load, _) = vm.image_loading();
    vm.image_loaded(load, 1000.0, 588.0);
    vm
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_state() {
    let vm = ViewModel::default();
    assert_eq!(vm.params, AnatomicalParameters::default());
    assert_eq!(vm.mode, Mode::Map);
    assert_eq!(vm.drag, DragState::None);
    assert_eq!(vm.hover, None);
    assert!(vm.regions.is_empty());
    assert_eq!(vm.image, ImageStatus::Empty);
    assert!(vm.last_estimate.is_none());
}

#[test]
fn pointer_before_first_frame_is_harmless() {
    let mut vm = ViewModel::new(table(), MapConfig::default());
    assert!(vm.on_pointer_down(pt(10.0, 10.0)).is_empty());
    assert_eq!(vm.drag, DragState::None);
    assert!(vm.on_pointer_move(pt(10.0, 10.0)).is_empty());
    assert!(vm.on_pointer_up(pt(10.0, 10.0)).is_empty());
}

// =============================================================
// Frame
// =============================================================

#[test]
fn commit_frame_rebuilds_regions() {
    let mut vm = vm();
    assert_eq!(vm.regions.len(), 4 + 52 + 12);
    vm.params.raphe = 175;
    vm.commit_frame();
    assert_eq!(anchor(&vm, RegionLabel::RapheEnd), device(&vm, raphe_end(&vm.params)));
}

#[test]
fn frame_uses_table_row() {
    let vm = vm();
    let row = vm.sectors().unwrap().to_vec();
    let FrameLayout::Map(map) = vm.frame() else { panic!("expected map frame") };
    let drawn: Vec<_> = map.dots.iter().map(|d| d.sector.unwrap()).collect();
    assert_eq!(drawn, row);
}

#[test]
fn missing_layer_draws_neutral_map() {
    let mut vm = vm();
    vm.set_config(MapConfig { pattern: TestPattern::G, ..MapConfig::default() });
    assert!(matches!(vm.sectors(), Err(SectorError::MissingLayer { .. })));
    let FrameLayout::Map(map) = vm.commit_frame() else { panic!("expected map frame") };
    assert_eq!(map.dots.len(), 59);
    assert!(map.dots.iter().all(|d| d.sector.is_none()));
}

#[test]
fn empty_table_still_renders() {
    let mut vm = ViewModel::default();
    assert!(matches!(vm.commit_frame(), FrameLayout::Map(_)));
    assert!(!vm.regions.is_empty());
}

#[test]
fn load_table_requests_render() {
    let mut vm = ViewModel::default();
    assert_eq!(vm.load_table(table()), vec![Action::RenderNeeded]);
    assert!(vm.sectors().is_ok());
}

// =============================================================
// Drag
// =============================================================

#[test]
fn raphe_drag_changes_only_raphe() {
    let mut vm = vm();
    let before = vm.params;

    let down = vm.on_pointer_down(anchor(&vm, RegionLabel::RapheEnd));
    assert_eq!(vm.drag, DragState::DragRaphe);
    assert!(down.contains(&Action::SetCursor("grabbing".into())));

    let target = AnatomicalParameters { raphe: 175, ..before };
    let moved = vm.on_pointer_move(device(&vm, raphe_end(&target)));
    assert_eq!(vm.params, target);
    assert_eq!(moved, vec![Action::ParamsChanged(target), Action::RenderNeeded]);

    let last = AnatomicalParameters { raphe: 178, ..before };
    let up = vm.on_pointer_up(device(&vm, raphe_end(&last)));
    assert_eq!(vm.params, last);
    assert_eq!(vm.drag, DragState::None);
    assert_eq!(up.last(), Some(&Action::SetCursor("default".into())));
}

#[test]
fn raphe_drag_clamps() {
    let mut vm = vm();
    vm.on_pointer_down(anchor(&vm, RegionLabel::RapheEnd));
    // Straight up from fixation is far outside the raphe range.
    vm.on_pointer_move(device(&vm, field_point(0.0, -20.0)));
    assert!(Param::Raphe.contains(vm.params.raphe));
    assert_eq!((vm.params.onhx, vm.params.onhy), (-15, 2));
}

#[test]
fn onh_drag_moves_both_axes() {
    let mut vm = vm();
    vm.on_pointer_down(anchor(&vm, RegionLabel::Onh));
    assert_eq!(vm.drag, DragState::DragOnh);
    vm.on_pointer_move(device(&vm, field_point(13.0, -1.0)));
    assert_eq!((vm.params.onhx, vm.params.onhy, vm.params.raphe), (-13, -1, 170));
}

#[test]
fn onh_x_drag_leaves_y() {
    let mut vm = vm();
    vm.on_pointer_down(anchor(&vm, RegionLabel::OnhX));
    assert_eq!(vm.drag, DragState::DragOnhX);
    vm.on_pointer_up(device(&vm, field_point(16.4, 9.0)));
    assert_eq!((vm.params.onhx, vm.params.onhy), (-16, 2));
    assert_eq!(vm.drag, DragState::None);
}

#[test]
fn onh_y_drag_leaves_x() {
    let mut vm = vm();
    vm.on_pointer_down(anchor(&vm, RegionLabel::OnhY));
    assert_eq!(vm.drag, DragState::DragOnhY);
    vm.on_pointer_move(device(&vm, field_point(-30.0, 3.6)));
    assert_eq!((vm.params.onhx, vm.params.onhy), (-15, 4));
}

#[test]
fn drag_within_same_cell_emits_nothing() {
    let mut vm = vm();
    vm.on_pointer_down(anchor(&vm, RegionLabel::Onh));
    assert!(vm.on_pointer_move(device(&vm, field_point(15.0, 2.0))).is_empty());
}

#[test]
fn pointer_down_on_dot_captures_nothing() {
    let mut vm = vm();
    assert!(vm.on_pointer_down(anchor(&vm, RegionLabel::Location(0))).is_empty());
    assert_eq!(vm.drag, DragState::None);
    assert!(vm.on_pointer_up(pt(0.0, 0.0)).is_empty());
}

#[test]
fn pointer_down_resolves_nearest_without_distance_gate() {
    let mut vm = vm();
    let onh = anchor(&vm, RegionLabel::Onh);
    vm.on_pointer_down(pt(onh.x + 4.0, onh.y - 3.0));
    assert_eq!(vm.drag, DragState::DragOnh);
}

// =============================================================
// Hover
// =============================================================

#[test]
fn hover_dot_highlights_its_sector() {
    let mut vm = vm();
    let sector = vm.sectors().unwrap()[0];
    assert_eq!(vm.on_pointer_move(anchor(&vm, RegionLabel::Location(0))), vec![Action::RenderNeeded]);
    assert_eq!(vm.hover, Some(sector));
    // Same highlight again: nothing to redraw.
    assert!(vm.on_pointer_move(anchor(&vm, RegionLabel::Location(0))).is_empty());
}

#[test]
fn hover_key_wedge_explodes_it() {
    let mut vm = vm();
    vm.on_pointer_move(anchor(&vm, RegionLabel::KeyWedge(5)));
    assert_eq!(vm.hover, Some(5));
    let FrameLayout::Map(map) = vm.commit_frame() else { panic!("expected map frame") };
    assert!(map.key[5].exploded);
    assert!(map.key.iter().filter(|w| w.exploded).count() == 1);
}

#[test]
fn hover_far_away_clears() {
    let mut vm = vm();
    vm.on_pointer_move(anchor(&vm, RegionLabel::KeyWedge(2)));
    assert_eq!(vm.on_pointer_move(pt(0.0, 0.0)), vec![Action::RenderNeeded]);
    assert_eq!(vm.hover, None);
}

#[test]
fn drag_clears_hover() {
    let mut vm = vm();
    vm.on_pointer_move(anchor(&vm, RegionLabel::KeyWedge(2)));
    vm.on_pointer_down(anchor(&vm, RegionLabel::Onh));
    assert_eq!(vm.hover, None);
}

// =============================================================
// Parameter edits
// =============================================================

#[test]
fn toggle_eye_keeps_stored_onhx() {
    let mut vm = vm();
    let actions = vm.toggle_eye();
    assert_eq!(vm.params.eye, Eye::Left);
    assert_eq!(vm.params.onhx, -15);
    assert_eq!(vm.params.display_onhx(), -15);
    assert_eq!(actions, vec![Action::ParamsChanged(vm.params), Action::RenderNeeded]);
}

#[test]
fn set_param_clamps_and_reports() {
    let mut vm = vm();
    assert!(!vm.set_param(Param::Onhy, 99).is_empty());
    assert_eq!(vm.params.onhy, 4);
    assert!(vm.set_param(Param::Onhy, 4).is_empty());
}

#[test]
fn field_edit_applies_clamped_value() {
    let mut vm = vm();
    let mut port = MemoryPort::new();
    port.write_field(Field::Raphe, "150");
    let actions = vm.field_edited(&port, Param::Raphe);
    assert_eq!(vm.params.raphe, 161);
    assert_eq!(actions, vec![Action::ParamsChanged(vm.params), Action::RenderNeeded]);
}

#[test]
fn rejected_field_edit_rewrites_form() {
    let mut vm = vm();
    let mut port = MemoryPort::new();
    port.write_field(Field::Onhx, "left a bit");
    let actions = vm.field_edited(&port, Param::Onhx);
    assert_eq!(vm.params, AnatomicalParameters::default());
    assert_eq!(actions, vec![Action::ParamsChanged(vm.params)]);
}

#[test]
fn set_config_clears_hover() {
    let mut vm = vm();
    vm.on_pointer_move(anchor(&vm, RegionLabel::KeyWedge(1)));
    let config = MapConfig { partition: Partition::GarwayHeath, ..MapConfig::default() };
    assert_eq!(vm.set_config(config), vec![Action::RenderNeeded]);
    assert_eq!(vm.hover, None);
    assert_eq!(vm.config, config);
}

// =============================================================
// Resize
// =============================================================

#[test]
fn resize_requests_render() {
    let mut vm = vm();
    assert_eq!(vm.resize(500.0, 1000.0), vec![Action::RenderNeeded]);
    assert_eq!(vm.viewport.device_width(), 500.0);
}

#[test]
fn degenerate_resize_is_ignored() {
    let mut vm = vm();
    assert!(vm.resize(0.0, 300.0).is_empty());
    assert_eq!(vm.viewport, Viewport::default());
}

#[test]
fn regions_follow_resize() {
    let mut vm = vm();
    vm.resize(500.0, 294.0);
    vm.commit_frame();
    let onh = anchor(&vm, RegionLabel::Onh);
    vm.on_pointer_down(onh);
    assert_eq!(vm.drag, DragState::DragOnh);
    vm.on_pointer_move(vm.viewport.to_device(field_point(13.0, -1.0)));
    assert_eq!((vm.params.onhx, vm.params.onhy), (-13, -1));
}

// =============================================================
// Calibration
// =============================================================

#[test]
fn clicks_ignored_in_map_mode() {
    let mut vm = vm();
    assert!(vm.on_click(pt(100.0, 100.0)).is_empty());
    assert!(vm.collector.points().is_empty());
}

#[test]
fn clicks_ignored_until_image_ready() {
    let mut vm = vm();
    vm.enter_calibration();
    assert!(vm.on_click(pt(100.0, 100.0)).is_empty());
    vm.image_loading();
    assert!(vm.on_click(pt(100.0, 100.0)).is_empty());
    assert!(vm.collector.points().is_empty());
}

#[test]
fn calibration_frame_has_no_regions() {
    let mut vm = vm();
    vm.enter_calibration();
    assert!(matches!(vm.commit_frame(), FrameLayout::Calibration(_)));
    assert!(vm.regions.is_empty());
    assert!(vm.on_pointer_down(pt(10.0, 10.0)).is_empty());
    assert!(vm.on_pointer_move(pt(10.0, 10.0)).is_empty());
}

#[test]
fn image_completion_redraws_once() {
    let mut vm = vm();
    let (load, actions) = vm.image_loading();
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(vm.mode, Mode::Calibration);
    assert!(vm.is_pending(load));
    assert_eq!(vm.image_loaded(load, 800.0, 600.0), vec![Action::RenderNeeded]);
    assert_eq!(vm.image, ImageStatus::Ready { width: 800.0, height: 600.0 });
    assert!(!vm.is_pending(load));
    assert!(vm.image_loaded(load, 800.0, 600.0).is_empty());
    assert!(vm.image_failed(load).is_empty());
}

#[test]
fn superseded_image_load_is_ignored() {
    let mut vm = vm();
    let (first, _) = vm.image_loading();
    let (second, _) = vm.image_loading();
    assert_ne!(first, second);
    assert!(!vm.is_pending(first));

    assert!(vm.image_loaded(first, 2000.0, 1176.0).is_empty());
    assert!(vm.image_failed(first).is_empty());
    assert!(vm.is_pending(second));

    assert_eq!(vm.image_loaded(second, 800.0, 600.0), vec![Action::RenderNeeded]);
    assert_eq!(vm.image, ImageStatus::Ready { width: 800.0, height: 600.0 });
    assert!(vm.image_loaded(first, 2000.0, 1176.0).is_empty());
    assert_eq!(vm.image.size(), Some((800.0, 600.0)));
}

#[test]
fn superseded_load_failure_keeps_newer_pending() {
    let mut vm = vm();
    let (first, _) = vm.image_loading();
    let (second, _) = vm.image_loading();
    assert!(vm.image_failed(first).is_empty());
    assert_eq!(vm.image, ImageStatus::Loading(second));
}

#[test]
fn image_failure_shows_placeholder() {
    let mut vm = vm();
    let (load, _) = vm.image_loading();
    assert_eq!(vm.image_failed(load), vec![Action::RenderNeeded]);
    assert_eq!(vm.image, ImageStatus::Empty);
    let FrameLayout::Calibration(cal) = vm.commit_frame() else { panic!("expected calibration frame") };
    assert!(!cal.image_ready);
}

#[test]
fn zero_sized_image_counts_as_failure() {
    let mut vm = vm();
    let (load, _) = vm.image_loading();
    vm.image_loaded(load, 0.0, 0.0);
    assert_eq!(vm.image, ImageStatus::Empty);
}

#[test]
fn three_clicks_calibrate_and_return_to_map() {
    let mut vm = calibrating();
    assert_eq!(vm.on_click(pt(300.0, 120.0)), vec![Action::RenderNeeded]);
    assert_eq!(vm.collector.step(), CalibrationStep::GetRing);
    vm.on_click(pt(150.0, 100.0));
    let actions = vm.on_click(pt(100.0, 100.0));

    assert_eq!(vm.mode, Mode::Map);
    assert_eq!(vm.params, AnatomicalParameters { eye: Eye::Left, onhx: -18, onhy: 2, raphe: 170 });
    let estimate = vm.last_estimate.unwrap();
    assert_eq!(estimate.eye, Eye::Left);
    assert_eq!(
        actions,
        vec![Action::Calibrated(estimate), Action::ParamsChanged(vm.params), Action::RenderNeeded]
    );
    assert!(vm.collector.points().is_empty());
}

#[test]
fn calibration_markers_are_drawn() {
    let mut vm = calibrating();
    vm.on_click(pt(300.0, 120.0));
    let FrameLayout::Calibration(cal) = vm.commit_frame() else { panic!("expected calibration frame") };
    assert!(cal.image_ready);
    assert_eq!(cal.markers.len(), 1);
    assert!(cal.markers[0].dist(pt(300.0, 120.0)) < 1e-9);
    assert_eq!(cal.prompt, CalibrationStep::GetRing.prompt());
}

#[test]
fn degenerate_calibration_leaves_params_unchanged() {
    let mut vm = calibrating();
    vm.params.raphe = 177;
    let before = vm.params;
    vm.on_click(pt(300.0, 120.0));
    vm.on_click(pt(100.0, 100.0));
    let actions = vm.on_click(pt(100.0, 100.0));

    assert_eq!(vm.params, before);
    assert!(vm.last_estimate.is_none());
    assert_eq!(vm.mode, Mode::Calibration);
    assert_eq!(vm.collector.step(), CalibrationStep::GetFovea);
    match &actions[0] {
        Action::CalibrationFailed(message) => assert!(message.starts_with("invalid calibration")),
        other => panic!("expected CalibrationFailed, got {other:?}"),
    }
}

#[test]
fn bad_ring_diameter_is_rejected() {
    let mut vm = calibrating();
    vm.config.ring_diameter_mm = 0.0;
    vm.on_click(pt(300.0, 120.0));
    vm.on_click(pt(150.0, 100.0));
    let actions = vm.on_click(pt(100.0, 100.0));
    assert!(matches!(actions[0], Action::CalibrationFailed(_)));
    assert_eq!(vm.params, AnatomicalParameters::default());
}

#[test]
fn clicks_map_through_image_size() {
    let mut vm = vm();
    let (load, _) = vm.image_loading();
    vm.image_loaded(load, 2000.0, 1176.0);
    vm.on_click(pt(500.0, 294.0));
    assert_eq!(vm.collector.points(), &[pt(1000.0, 588.0)]);
}

#[test]
fn leave_calibration_resets_clicks() {
    let mut vm = calibrating();
    vm.on_click(pt(300.0, 120.0));
    assert_eq!(vm.leave_calibration(), vec![Action::RenderNeeded]);
    assert_eq!(vm.mode, Mode::Map);
    assert!(vm.collector.points().is_empty());
}
