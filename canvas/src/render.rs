//! Rendering: draws a [`FrameLayout`] to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Layout arrives in virtual units and is scaled through the [`Viewport`] here;
//! nothing in this module mutates application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::consts::{DOT_RADIUS, HANDLE_RADIUS, KEY_RADIUS, KEY_Y_STRETCH, LANDMARK_RADIUS, VIRTUAL_W};
use crate::layout::{CalibrationLayout, FrameLayout, KeyWedge, Label, MapLayout, Segment};
use crate::viewport::{Point, Viewport};

/// Label font size in virtual units.
const FONT_SIZE: f64 = 14.0;

const INK: &str = "#000";
const AXIS_COLOR: &str = "#444";
const FODI_COLOR: &str = "#999";
const ONH_COLOR: &str = "#333";
const LANDMARK_COLOR: &str = "#FF0000";
const PLACEHOLDER_COLOR: &str = "#EEE";

/// Draw one frame.
///
/// `image` is the decoded calibration image; without it the calibration view
/// shows a placeholder.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    frame: &FrameLayout,
    viewport: &Viewport,
    image: Option<&HtmlImageElement>,
) -> Result<(), JsValue> {
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport.device_width(), viewport.device_height());
    ctx.set_font(&format!("{:.0}px sans-serif", viewport.scale(FONT_SIZE).max(1.0)));
    ctx.set_text_baseline("middle");

    match frame {
        FrameLayout::Map(map) => draw_map(ctx, map, viewport),
        FrameLayout::Calibration(cal) => draw_calibration(ctx, cal, viewport, image),
    }
}

// =============================================================
// Map
// =============================================================

fn draw_map(ctx: &CanvasRenderingContext2d, map: &MapLayout, vp: &Viewport) -> Result<(), JsValue> {
    // Layer 1: axes and labels.
    ctx.set_stroke_style_str(AXIS_COLOR);
    ctx.set_line_width(1.0);
    for seg in map.axes.iter().chain(&map.ticks) {
        draw_segment(ctx, vp, *seg);
    }
    ctx.set_fill_style_str(INK);
    for label in &map.labels {
        draw_label(ctx, vp, label)?;
    }

    // Layer 2: test locations.
    for dot in &map.dots {
        ctx.begin_path();
        ctx.arc(vp.scale(dot.center.x), vp.yscale(dot.center.y), vp.scale(DOT_RADIUS), 0.0, TAU)?;
        ctx.set_fill_style_str(dot.color);
        ctx.fill();
        if dot.highlighted {
            ctx.set_stroke_style_str(INK);
            ctx.set_line_width(vp.scale(3.0).max(1.0));
            ctx.stroke();
        }
    }

    // Layer 3: fovea-disc line, blind spot and raphe.
    ctx.set_line_width(1.0);
    ctx.set_stroke_style_str(FODI_COLOR);
    draw_segment(ctx, vp, Segment { from: map.fixation, to: map.onh });

    ctx.begin_path();
    ctx.arc(vp.scale(map.onh.x), vp.yscale(map.onh.y), vp.scale(map.onh_radius), 0.0, TAU)?;
    ctx.set_fill_style_str(ONH_COLOR);
    ctx.fill();

    ctx.set_stroke_style_str(INK);
    ctx.set_line_width(vp.scale(2.0).max(1.0));
    draw_segment(ctx, vp, Segment { from: map.fixation, to: map.raphe_end });

    // Layer 4: handles.
    ctx.set_fill_style_str(INK);
    for handle in [map.raphe_end, map.onhx_handle, map.onhy_handle] {
        draw_disc(ctx, vp, handle, HANDLE_RADIUS)?;
    }

    // Layer 5: key pie.
    for wedge in &map.key {
        draw_wedge(ctx, vp, wedge)?;
    }
    Ok(())
}

fn draw_segment(ctx: &CanvasRenderingContext2d, vp: &Viewport, seg: Segment) {
    ctx.begin_path();
    ctx.move_to(vp.midpx_scale(seg.from.x), vp.midpx_yscale(seg.from.y));
    ctx.line_to(vp.midpx_scale(seg.to.x), vp.midpx_yscale(seg.to.y));
    ctx.stroke();
}

fn draw_disc(ctx: &CanvasRenderingContext2d, vp: &Viewport, at: Point, radius: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(vp.scale(at.x), vp.yscale(at.y), vp.scale(radius).max(1.0), 0.0, TAU)?;
    ctx.fill();
    Ok(())
}

fn draw_label(ctx: &CanvasRenderingContext2d, vp: &Viewport, label: &Label) -> Result<(), JsValue> {
    ctx.set_text_align(label.align.as_css());
    ctx.fill_text(&label.text, vp.scale(label.at.x), vp.yscale(label.at.y))
}

/// A wedge of the key, drawn in a frame stretched vertically about its apex.
fn draw_wedge(ctx: &CanvasRenderingContext2d, vp: &Viewport, wedge: &KeyWedge) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(vp.scale(wedge.apex.x), vp.yscale(wedge.apex.y))?;
    ctx.scale(1.0, KEY_Y_STRETCH)?;
    ctx.begin_path();
    ctx.move_to(0.0, 0.0);
    // Canvas angles run clockwise, so the math sweep is traced anticlockwise.
    ctx.arc_with_anticlockwise(0.0, 0.0, vp.scale(KEY_RADIUS), -wedge.start_rad, -wedge.end_rad, true)?;
    ctx.close_path();
    ctx.set_fill_style_str(wedge.color);
    ctx.fill();
    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(1.0);
    ctx.stroke();
    ctx.restore();
    Ok(())
}

// =============================================================
// Calibration
// =============================================================

fn draw_calibration(
    ctx: &CanvasRenderingContext2d,
    cal: &CalibrationLayout,
    vp: &Viewport,
    image: Option<&HtmlImageElement>,
) -> Result<(), JsValue> {
    let (w, h) = (vp.device_width(), vp.device_height());
    match image.filter(|_| cal.image_ready) {
        Some(img) => ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h)?,
        None => {
            ctx.set_fill_style_str(PLACEHOLDER_COLOR);
            ctx.fill_rect(0.0, 0.0, w, h);
        }
    }

    ctx.set_stroke_style_str(LANDMARK_COLOR);
    ctx.set_line_width(vp.scale(2.0).max(1.0));
    for marker in &cal.markers {
        ctx.begin_path();
        ctx.arc(vp.scale(marker.x), vp.yscale(marker.y), vp.scale(2.0 * LANDMARK_RADIUS), 0.0, TAU)?;
        ctx.stroke();
    }

    ctx.set_fill_style_str(if cal.image_ready { LANDMARK_COLOR } else { INK });
    ctx.set_text_align("center");
    ctx.fill_text(cal.prompt, vp.scale(VIRTUAL_W / 2.0), vp.yscale(FONT_SIZE * 1.5))
}
