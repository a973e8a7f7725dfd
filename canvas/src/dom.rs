//! [`UiPort`] over the page's form elements.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement};

use crate::ui_port::{Field, UiPort};

/// Reads and writes fields by element id.
///
/// `<input>` elements use their value; any other element its text content.
pub struct DomPort {
    document: Document,
}

impl DomPort {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl UiPort for DomPort {
    fn read_field(&self, field: Field) -> Option<String> {
        let element = self.document.get_element_by_id(field.id())?;
        match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => Some(input.value()),
            Err(element) => element.text_content(),
        }
    }

    fn write_field(&mut self, field: Field, value: &str) {
        let Some(element) = self.document.get_element_by_id(field.id()) else {
            tracing::debug!(id = field.id(), "no element for field");
            return;
        };
        match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => input.set_value(value),
            Err(element) => element.set_text_content(Some(value)),
        }
    }
}
