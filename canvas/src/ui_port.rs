//! Form fields next to the canvas, behind a port.
//!
//! The core never touches DOM elements. It reads and writes named fields
//! through [`UiPort`]; the browser host implements it over `<input>` elements
//! and tests use [`MemoryPort`].

#[cfg(test)]
#[path = "ui_port_test.rs"]
mod ui_port_test;

use std::collections::HashMap;

use crate::calibration::OnhEstimate;
use crate::params::{AnatomicalParameters, Param, round_half_up};

/// A named field in the surrounding form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// ONH x, signed as displayed for the current eye.
    Onhx,
    Onhy,
    Raphe,
    Eye,
    /// Calibration readouts, e.g. `"-15° (-15.23)"`.
    OnhxLabel,
    OnhyLabel,
    /// Status line under the canvas.
    Status,
}

impl Field {
    /// Element id of the field.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Onhx => "onhx",
            Self::Onhy => "onhy",
            Self::Raphe => "raphe",
            Self::Eye => "eye",
            Self::OnhxLabel => "onhx-label",
            Self::OnhyLabel => "onhy-label",
            Self::Status => "status",
        }
    }

    /// The editable field for a parameter.
    #[must_use]
    pub fn for_param(param: Param) -> Self {
        match param {
            Param::Onhx => Self::Onhx,
            Param::Onhy => Self::Onhy,
            Param::Raphe => Self::Raphe,
        }
    }
}

/// Read and write access to the form.
pub trait UiPort {
    /// Current text of `field`, or `None` if the field does not exist.
    fn read_field(&self, field: Field) -> Option<String>;

    /// Replace the text of `field`. Missing fields are ignored.
    fn write_field(&mut self, field: Field, value: &str);
}

/// In-memory [`UiPort`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPort {
    fields: HashMap<Field, String>,
}

impl MemoryPort {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UiPort for MemoryPort {
    fn read_field(&self, field: Field) -> Option<String> {
        self.fields.get(&field).cloned()
    }

    fn write_field(&mut self, field: Field, value: &str) {
        self.fields.insert(field, value.to_owned());
    }
}

/// Show `params` in the form.
pub fn push_params(port: &mut impl UiPort, params: &AnatomicalParameters) {
    for param in Param::ALL {
        port.write_field(Field::for_param(param), &params.get(param).to_string());
    }
    port.write_field(Field::Eye, params.eye.as_str());
}

/// Show the raw calibration result and clear any earlier failure message.
pub fn push_estimate(port: &mut impl UiPort, estimate: &OnhEstimate) {
    port.write_field(Field::OnhxLabel, &estimate.onhx_label());
    port.write_field(Field::OnhyLabel, &estimate.onhy_label());
    port.write_field(Field::Status, "");
}

/// Parse a typed degree value, rounding to whole degrees.
fn parse_degrees(text: &str) -> Option<i32> {
    let Ok(value) = text.trim().trim_end_matches('\u{b0}').trim().parse::<f64>() else {
        return None;
    };
    if !value.is_finite() {
        return None;
    }
    // Anything this far out clamps to a bound anyway.
    #[allow(clippy::cast_possible_truncation)]
    let rounded = round_half_up(value).clamp(-1000.0, 1000.0) as i32;
    Some(rounded)
}

/// Apply a manual edit of `param`'s field, clamping into bounds.
///
/// Returns `true` if the parameters changed. Unparseable text leaves them as
/// they were.
pub fn pull_param(port: &impl UiPort, params: &mut AnatomicalParameters, param: Param) -> bool {
    let field = Field::for_param(param);
    let Some(text) = port.read_field(field) else {
        return false;
    };
    let Some(value) = parse_degrees(&text) else {
        tracing::debug!(field = field.id(), text, "ignoring unparseable field edit");
        return false;
    };
    let before = *params;
    params.set(param, value);
    *params != before
}
