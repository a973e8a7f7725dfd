//! JavaScript entry point.
//!
//! The page constructs one [`MapApp`] per canvas and forwards DOM events to
//! it. Pointer positions are CSS pixels relative to the canvas.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{File, HtmlCanvasElement};

use crate::config::MapConfig;
use crate::dom::DomPort;
use crate::engine::{Action, Engine, ViewModel};
use crate::params::Param;
use crate::sector::SectorTable;
use crate::viewport::Point;

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct MapApp {
    engine: Rc<RefCell<Engine>>,
}

#[wasm_bindgen]
impl MapApp {
    /// Bind to the canvas with id `canvas_id`.
    ///
    /// `table_json` is the sector table asset; `config_json` may be empty for
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas is missing or either JSON document is
    /// invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, table_json: &str, config_json: &str) -> Result<MapApp, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let table = SectorTable::from_json(table_json).map_err(js_err)?;
        let config = if config_json.trim().is_empty() {
            MapConfig::default()
        } else {
            MapConfig::from_json(config_json).map_err(js_err)?
        };

        let mut engine = Engine::new(canvas, DomPort::new(document), ViewModel::new(table, config));
        let params = engine.core.params;
        engine.apply(&[Action::ParamsChanged(params), Action::RenderNeeded])?;
        Ok(MapApp { engine: Rc::new(RefCell::new(engine)) })
    }

    pub fn resize(&self, width: f64, height: f64) -> Result<(), JsValue> {
        self.engine.borrow_mut().resize(width, height)
    }

    pub fn pointer_down(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.engine.borrow_mut().pointer_down(Point::new(x, y))
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.engine.borrow_mut().pointer_move(Point::new(x, y))
    }

    pub fn pointer_up(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.engine.borrow_mut().pointer_up(Point::new(x, y))
    }

    pub fn click(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.engine.borrow_mut().click(Point::new(x, y))
    }

    pub fn toggle_eye(&self) -> Result<(), JsValue> {
        self.engine.borrow_mut().toggle_eye()
    }

    /// A form field changed. `name` is `onhx`, `onhy` or `raphe`.
    pub fn field_edited(&self, name: &str) -> Result<(), JsValue> {
        let param = Param::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown field '{name}'")))?;
        self.engine.borrow_mut().field_edited(param)
    }

    /// Replace the map settings, e.g. after the pattern selector changes.
    pub fn set_config(&self, config_json: &str) -> Result<(), JsValue> {
        let config = MapConfig::from_json(config_json).map_err(js_err)?;
        let mut engine = self.engine.borrow_mut();
        let actions = engine.core.set_config(config);
        engine.apply(&actions)
    }

    pub fn load_image(&self, file: &File) -> Result<(), JsValue> {
        Engine::load_image(&self.engine, file)
    }

    pub fn enter_calibration(&self) -> Result<(), JsValue> {
        let mut engine = self.engine.borrow_mut();
        let actions = engine.core.enter_calibration();
        engine.apply(&actions)
    }

    pub fn leave_calibration(&self) -> Result<(), JsValue> {
        let mut engine = self.engine.borrow_mut();
        let actions = engine.core.leave_calibration();
        engine.apply(&actions)
    }
}
