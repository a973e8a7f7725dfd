use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, File, HtmlCanvasElement, HtmlImageElement};

use crate::calibration::{LandmarkCollector, OnhEstimate, estimate_from_triple};
use crate::config::MapConfig;
use crate::dom::DomPort;
use crate::hit::{InteractiveRegion, nearest};
use crate::image;
use crate::input::{DragState, apply_drag, hover_sector};
use crate::layout::{CalibrationLayout, FrameLayout, MapLayout, virtual_to_image};
use crate::params::{AnatomicalParameters, Param};
use crate::render;
use crate::sector::{SectorError, SectorTable};
use crate::ui_port::{Field, UiPort, pull_param, push_estimate, push_params};
use crate::viewport::{Point, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    /// Parameters differ from what the form shows.
    ParamsChanged(AnatomicalParameters),
    /// A calibration completed; carries the unrounded result.
    Calibrated(OnhEstimate),
    CalibrationFailed(String),
    SetCursor(String),
}

/// Which screen the canvas shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Map,
    Calibration,
}

/// Identifies one image decode. A newer load supersedes older ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadId(u32);

/// Decode state of the calibration image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ImageStatus {
    #[default]
    Empty,
    Loading(LoadId),
    Ready { width: f64, height: f64 },
}

impl ImageStatus {
    /// Natural size once decoded.
    #[must_use]
    pub fn size(self) -> Option<(f64, f64)> {
        match self {
            Self::Ready { width, height } => Some((width, height)),
            Self::Empty | Self::Loading(_) => None,
        }
    }
}

/// All session state, independent of the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser
/// dependencies. Handlers take device-pixel positions and return the actions
/// the host must carry out.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub params: AnatomicalParameters,
    pub config: MapConfig,
    pub table: SectorTable,
    pub viewport: Viewport,
    pub mode: Mode,
    pub drag: DragState,
    /// Highlighted sector.
    pub hover: Option<u8>,
    /// Anchors of the last committed frame, device pixels.
    pub regions: Vec<InteractiveRegion>,
    pub image: ImageStatus,
    next_load: u32,
    pub collector: LandmarkCollector,
    pub last_estimate: Option<OnhEstimate>,
}

impl ViewModel {
    #[must_use]
    pub fn new(table: SectorTable, config: MapConfig) -> Self {
        Self { table, config, ..Self::default() }
    }

    fn params_changed(&self) -> Vec<Action> {
        vec![Action::ParamsChanged(self.params), Action::RenderNeeded]
    }

    // --- Data inputs ---

    pub fn load_table(&mut self, table: SectorTable) -> Vec<Action> {
        self.table = table;
        vec![Action::RenderNeeded]
    }

    pub fn set_config(&mut self, config: MapConfig) -> Vec<Action> {
        self.config = config;
        self.hover = None;
        vec![Action::RenderNeeded]
    }

    /// Flip laterality. The stored onhx is kept, so only its sign on screen flips.
    pub fn toggle_eye(&mut self) -> Vec<Action> {
        self.params.eye = self.params.eye.toggled();
        self.hover = None;
        self.params_changed()
    }

    /// Set one parameter from a typed value (`Onhx` as displayed), clamped.
    pub fn set_param(&mut self, param: Param, value: i32) -> Vec<Action> {
        let before = self.params;
        self.params.set(param, value);
        if self.params == before { Vec::new() } else { self.params_changed() }
    }

    /// Take a manual edit of `param` from the form.
    ///
    /// The form is always rewritten, so a rejected or clamped edit shows the
    /// value actually in use.
    pub fn field_edited(&mut self, port: &impl UiPort, param: Param) -> Vec<Action> {
        if pull_param(port, &mut self.params, param) {
            self.params_changed()
        } else {
            vec![Action::ParamsChanged(self.params)]
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Vec<Action> {
        if self.viewport.resize(width, height) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Frame ---

    /// Sector row for the current parameters.
    ///
    /// # Errors
    ///
    /// [`SectorError`] if the table has no layer for the active pattern and
    /// partition.
    pub fn sectors(&self) -> Result<&[u8], SectorError> {
        self.table.lookup_params(&self.params, self.config.pattern, self.config.partition)
    }

    /// Lay out the current state without touching the region list.
    #[must_use]
    pub fn frame(&self) -> FrameLayout {
        match self.mode {
            Mode::Map => {
                let sectors = match self.sectors() {
                    Ok(row) => Some(row),
                    Err(err) => {
                        tracing::warn!(%err, "drawing map without sectors");
                        None
                    }
                };
                FrameLayout::Map(MapLayout::build(
                    &self.params,
                    sectors,
                    self.config.pattern,
                    self.config.partition,
                    self.hover,
                ))
            }
            Mode::Calibration => FrameLayout::Calibration(CalibrationLayout::build(
                self.image.size(),
                self.collector.points(),
                self.collector.step(),
            )),
        }
    }

    /// Lay out the frame and replace the region list with its anchors.
    pub fn commit_frame(&mut self) -> FrameLayout {
        let frame = self.frame();
        self.regions = frame.regions(&self.viewport);
        frame
    }

    // --- Pointer ---

    pub fn on_pointer_down(&mut self, device: Point) -> Vec<Action> {
        if self.mode != Mode::Map {
            return Vec::new();
        }
        let hit = nearest(device, &self.regions);
        self.drag = DragState::from_label(hit.label);
        if !self.drag.is_dragging() {
            return Vec::new();
        }
        tracing::debug!(drag = ?self.drag, "drag captured");
        self.hover = None;
        vec![Action::SetCursor("grabbing".into()), Action::RenderNeeded]
    }

    pub fn on_pointer_move(&mut self, device: Point) -> Vec<Action> {
        if self.mode != Mode::Map {
            return Vec::new();
        }
        if self.drag.is_dragging() {
            return self.drag_to(device);
        }
        let hover = hover_sector(nearest(device, &self.regions), self.sectors().unwrap_or(&[]), &self.viewport);
        if hover == self.hover {
            return Vec::new();
        }
        self.hover = hover;
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, device: Point) -> Vec<Action> {
        if !self.drag.is_dragging() {
            return Vec::new();
        }
        let mut actions = self.drag_to(device);
        tracing::debug!(drag = ?self.drag, params = ?self.params, "drag released");
        self.drag = DragState::None;
        actions.push(Action::SetCursor("default".into()));
        actions
    }

    fn drag_to(&mut self, device: Point) -> Vec<Action> {
        let virt = self.viewport.to_virtual(device);
        if apply_drag(self.drag, &mut self.params, virt) { self.params_changed() } else { Vec::new() }
    }

    // --- Calibration ---

    pub fn enter_calibration(&mut self) -> Vec<Action> {
        self.mode = Mode::Calibration;
        self.drag = DragState::None;
        self.hover = None;
        self.collector.reset();
        vec![Action::RenderNeeded]
    }

    pub fn leave_calibration(&mut self) -> Vec<Action> {
        self.mode = Mode::Map;
        self.collector.reset();
        vec![Action::RenderNeeded]
    }

    /// A new image file was chosen; show the placeholder until it decodes.
    ///
    /// Returns the id the completion must carry. Any earlier pending load is
    /// superseded.
    pub fn image_loading(&mut self) -> (LoadId, Vec<Action>) {
        self.next_load = self.next_load.wrapping_add(1);
        let load = LoadId(self.next_load);
        self.image = ImageStatus::Loading(load);
        (load, self.enter_calibration())
    }

    /// Whether `load` is the decode currently awaited.
    #[must_use]
    pub fn is_pending(&self, load: LoadId) -> bool {
        self.image == ImageStatus::Loading(load)
    }

    /// The pending image decoded. Only the first completion of the latest load
    /// redraws.
    pub fn image_loaded(&mut self, load: LoadId, width: f64, height: f64) -> Vec<Action> {
        if !self.is_pending(load) {
            tracing::debug!(?load, status = ?self.image, "ignoring stale image completion");
            return Vec::new();
        }
        if !(width > 0.0 && height > 0.0) {
            return self.image_failed(load);
        }
        tracing::debug!(width, height, "calibration image ready");
        self.image = ImageStatus::Ready { width, height };
        vec![Action::RenderNeeded]
    }

    pub fn image_failed(&mut self, load: LoadId) -> Vec<Action> {
        if !self.is_pending(load) {
            tracing::debug!(?load, status = ?self.image, "ignoring stale image failure");
            return Vec::new();
        }
        tracing::warn!("calibration image failed to decode");
        self.image = ImageStatus::Empty;
        vec![Action::RenderNeeded]
    }

    /// Record a landmark click. The third click calibrates and returns to the map.
    pub fn on_click(&mut self, device: Point) -> Vec<Action> {
        if self.mode != Mode::Calibration {
            return Vec::new();
        }
        let Some(size) = self.image.size() else {
            tracing::debug!("calibration click before image is ready");
            return Vec::new();
        };
        let at = virtual_to_image(self.viewport.to_virtual(device), size);
        let Some(triple) = self.collector.click(at) else {
            return vec![Action::RenderNeeded];
        };
        match estimate_from_triple(&triple, self.config.ring_diameter_mm) {
            Ok(estimate) => {
                self.params = estimate.apply_to(self.params);
                self.last_estimate = Some(estimate);
                self.mode = Mode::Map;
                self.collector.reset();
                tracing::info!(params = ?self.params, "calibrated");
                let mut actions = vec![Action::Calibrated(estimate)];
                actions.extend(self.params_changed());
                actions
            }
            Err(err) => {
                tracing::warn!(%err, "calibration rejected");
                self.collector.reset();
                vec![Action::CalibrationFailed(err.to_string()), Action::RenderNeeded]
            }
        }
    }
}

// =============================================================
// Browser host
// =============================================================

/// The full canvas engine. Wraps `ViewModel` and owns the browser elements.
pub struct Engine {
    canvas: HtmlCanvasElement,
    port: DomPort,
    image: Option<HtmlImageElement>,
    pub core: ViewModel,
}

impl Engine {
    /// Create an engine bound to `canvas`, reading and writing the form through `port`.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, port: DomPort, core: ViewModel) -> Self {
        Self { canvas, port, image: None, core }
    }

    /// Carry out handler actions. Redraws at most once.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas cannot be styled or drawn.
    pub fn apply(&mut self, actions: &[Action]) -> Result<(), JsValue> {
        let mut render = false;
        for action in actions {
            match action {
                Action::RenderNeeded => render = true,
                Action::ParamsChanged(params) => push_params(&mut self.port, params),
                Action::Calibrated(estimate) => push_estimate(&mut self.port, estimate),
                Action::CalibrationFailed(message) => self.port.write_field(Field::Status, message),
                Action::SetCursor(cursor) => self.canvas.style().set_property("cursor", cursor)?,
            }
        }
        if render { self.render() } else { Ok(()) }
    }

    // --- Delegated inputs ---

    /// Fit the canvas into `width` × `height` CSS pixels.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the redraw fails.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        let actions = self.core.resize(width, height);
        // Whole device pixels after resize.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            self.canvas.set_width(self.core.viewport.device_width() as u32);
            self.canvas.set_height(self.core.viewport.device_height() as u32);
        }
        self.apply(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the host actions fail.
    pub fn pointer_down(&mut self, device: Point) -> Result<(), JsValue> {
        let actions = self.core.on_pointer_down(device);
        self.apply(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the host actions fail.
    pub fn pointer_move(&mut self, device: Point) -> Result<(), JsValue> {
        let actions = self.core.on_pointer_move(device);
        self.apply(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the host actions fail.
    pub fn pointer_up(&mut self, device: Point) -> Result<(), JsValue> {
        let actions = self.core.on_pointer_up(device);
        self.apply(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the host actions fail.
    pub fn click(&mut self, device: Point) -> Result<(), JsValue> {
        let actions = self.core.on_click(device);
        self.apply(&actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the host actions fail.
    pub fn toggle_eye(&mut self) -> Result<(), JsValue> {
        let actions = self.core.toggle_eye();
        self.apply(&actions)
    }

    /// The user typed into a parameter field.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host actions fail.
    pub fn field_edited(&mut self, param: Param) -> Result<(), JsValue> {
        let actions = self.core.field_edited(&self.port, param);
        self.apply(&actions)
    }

    /// Start decoding `file` and switch to calibration.
    ///
    /// The decoded image triggers exactly one redraw when it arrives.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the object URL or image element cannot be created.
    pub fn load_image(engine: &Rc<RefCell<Self>>, file: &File) -> Result<(), JsValue> {
        let load = {
            let mut engine = engine.borrow_mut();
            let (load, actions) = engine.core.image_loading();
            engine.apply(&actions)?;
            load
        };
        let weak = Rc::downgrade(engine);
        let started = image::load(file, move |decoded| {
            let Some(engine) = weak.upgrade() else {
                return;
            };
            let mut engine = engine.borrow_mut();
            if !engine.core.is_pending(load) {
                tracing::debug!(?load, "dropping superseded image");
                return;
            }
            let actions = match decoded {
                Ok(img) => {
                    let (w, h) = (f64::from(img.natural_width()), f64::from(img.natural_height()));
                    let actions = engine.core.image_loaded(load, w, h);
                    if engine.core.image.size().is_some() {
                        engine.image = Some(img);
                    }
                    actions
                }
                Err(()) => {
                    engine.image = None;
                    engine.core.image_failed(load)
                }
            };
            if let Err(err) = engine.apply(&actions) {
                tracing::warn!(?err, "redraw after image load failed");
            }
        });
        if let Err(err) = started {
            let mut engine = engine.borrow_mut();
            let actions = engine.core.image_failed(load);
            engine.apply(&actions)?;
            return Err(err);
        }
        Ok(())
    }

    // --- Render ---

    /// Draw the current state to the canvas and rebuild the region list.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let frame = self.core.commit_frame();
        let image = match self.core.image {
            ImageStatus::Ready { .. } => self.image.as_ref(),
            ImageStatus::Empty | ImageStatus::Loading(_) => None,
        };
        render::draw(&ctx, &frame, &self.core.viewport, image)
    }
}
