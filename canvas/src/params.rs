//! Anatomical parameters: eye laterality, ONH position and raphe angle.
//!
//! `onhx` is always held in the left-eye frame (negative, temporal of the
//! fovea in the visual field). A right eye is the mirror image, so only the
//! displayed sign changes with laterality. Every write goes through a clamp.

#[cfg(test)]
#[path = "params_test.rs"]
mod params_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ONHX_MAX, ONHX_MIN, ONHY_MAX, ONHY_MIN, RAPHE_MAX, RAPHE_MIN};

/// Eye laterality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eye {
    Left,
    #[default]
    Right,
}

impl Eye {
    /// Horizontal factor from the left-eye frame to the displayed frame.
    #[must_use]
    pub fn mirror(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }

    /// The other eye.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Convert a stored (left-eye) onhx to the value shown for this eye.
    #[must_use]
    pub fn display_onhx(self, stored: i32) -> i32 {
        match self {
            Self::Left => stored,
            Self::Right => -stored,
        }
    }

    /// Convert an onhx shown for this eye back to the stored (left-eye) value.
    #[must_use]
    pub fn stored_onhx(self, displayed: i32) -> i32 {
        // Mirroring is its own inverse.
        self.display_onhx(displayed)
    }

    /// Lowercase name, as used in configuration and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::str::FromStr for Eye {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" | "os" => Ok(Self::Left),
            "right" | "r" | "od" => Ok(Self::Right),
            other => Err(format!("unknown eye '{other}' (expected 'left' or 'right')")),
        }
    }
}

/// Which anatomical parameter a bound or edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Onhx,
    Onhy,
    Raphe,
}

impl Param {
    pub const ALL: [Self; 3] = [Self::Onhx, Self::Onhy, Self::Raphe];

    /// Inclusive bounds. For `Onhx` these are in the stored (left-eye) frame.
    #[must_use]
    pub fn bounds(self) -> (i32, i32) {
        match self {
            Self::Onhx => (ONHX_MIN, ONHX_MAX),
            Self::Onhy => (ONHY_MIN, ONHY_MAX),
            Self::Raphe => (RAPHE_MIN, RAPHE_MAX),
        }
    }

    #[must_use]
    pub fn clamp(self, v: i32) -> i32 {
        let (min, max) = self.bounds();
        v.clamp(min, max)
    }

    #[must_use]
    pub fn contains(self, v: i32) -> bool {
        let (min, max) = self.bounds();
        (min..=max).contains(&v)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Onhx => "onhx",
            Self::Onhy => "onhy",
            Self::Raphe => "raphe",
        }
    }
}

/// Round to the nearest whole number, halves toward positive infinity.
///
/// `-15.5` becomes `-15`, matching the rounding the page's form script uses.
#[must_use]
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Round a floating-point degree value and clamp it into `param`'s bounds.
///
/// Non-finite input yields `None` so it can never reach the parameters.
#[must_use]
pub fn clamp_degrees(param: Param, deg: f64) -> Option<i32> {
    if !deg.is_finite() {
        return None;
    }
    let (min, max) = param.bounds();
    #[allow(clippy::cast_possible_truncation)]
    let rounded = round_half_up(deg).clamp(f64::from(min), f64::from(max)) as i32;
    Some(rounded)
}

/// The session's anatomical parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnatomicalParameters {
    pub eye: Eye,
    /// ONH x in degrees, left-eye frame.
    pub onhx: i32,
    /// ONH y in degrees.
    pub onhy: i32,
    /// Raphe angle in degrees.
    pub raphe: i32,
}

impl Default for AnatomicalParameters {
    fn default() -> Self {
        Self { eye: Eye::Right, onhx: -15, onhy: 2, raphe: 170 }
    }
}

impl AnatomicalParameters {
    /// Build parameters, clamping each value into bounds.
    #[must_use]
    pub fn new(eye: Eye, onhx: i32, onhy: i32, raphe: i32) -> Self {
        Self { eye, onhx, onhy, raphe }.clamped()
    }

    /// A copy with every field clamped into bounds.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            eye: self.eye,
            onhx: Param::Onhx.clamp(self.onhx),
            onhy: Param::Onhy.clamp(self.onhy),
            raphe: Param::Raphe.clamp(self.raphe),
        }
    }

    /// onhx with the sign shown for the current eye.
    #[must_use]
    pub fn display_onhx(&self) -> i32 {
        self.eye.display_onhx(self.onhx)
    }

    /// Set one parameter. `Onhx` takes the displayed value for the current eye.
    pub fn set(&mut self, param: Param, value: i32) {
        match param {
            Param::Onhx => self.onhx = Param::Onhx.clamp(self.eye.stored_onhx(value)),
            Param::Onhy => self.onhy = Param::Onhy.clamp(value),
            Param::Raphe => self.raphe = Param::Raphe.clamp(value),
        }
    }

    /// Read one parameter. `Onhx` is returned as displayed for the current eye.
    #[must_use]
    pub fn get(&self, param: Param) -> i32 {
        match param {
            Param::Onhx => self.display_onhx(),
            Param::Onhy => self.onhy,
            Param::Raphe => self.raphe,
        }
    }

    /// Fovea-to-disc angle in radians, measured in the left-eye frame.
    #[must_use]
    pub fn fodi(&self) -> f64 {
        f64::from(-self.onhy).atan2(f64::from(-self.onhx))
    }
}
