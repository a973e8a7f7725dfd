//! Calibration: ONH position from landmarks clicked on a fundus or OCT image.
//!
//! A scan ring of known diameter fixes the image scale. Distances on the
//! retina are then converted to visual-field degrees through the nodal point
//! of a schematic eye.
//!
//! Two estimators answer the same question from different landmark roles:
//!
//! - [`estimate_from_triple`]: fovea, a point on the ring edge, and the ONH
//!   centre (the ring is centred on the ONH, so ring-edge to centre is a
//!   radius).
//! - [`estimate_direct`]: fovea, ONH centre, and an explicit pair of points a
//!   ring radius apart.
//!
//! Both reject a degenerate scale pair instead of producing NaN or infinity.

#[cfg(test)]
#[path = "calibration_test.rs"]
mod calibration_test;

use serde::{Deserialize, Serialize};

use crate::consts::{NODAL_PROPORTION, SCHEMATIC_NODAL_MM};
use crate::params::{AnatomicalParameters, Eye, Param, clamp_degrees};
use crate::viewport::Point;

/// Distance from the nodal point used for the retina-to-field conversion, in mm.
#[must_use]
pub fn nodal_distance_mm() -> f64 {
    SCHEMATIC_NODAL_MM * 2.0 * NODAL_PROPORTION
}

/// Convert a distance on the retina (mm) to visual-field degrees.
#[must_use]
pub fn to_vf(mm: f64) -> f64 {
    mm.atan2(nodal_distance_mm()).to_degrees()
}

/// Calibration failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    /// The two scale-defining landmarks coincide.
    #[error("invalid calibration: scale landmarks coincide")]
    CoincidentLandmarks,
    /// The ring diameter is not a positive, finite length.
    #[error("invalid calibration: ring diameter {0} mm")]
    RingDiameter(f64),
    /// A landmark coordinate is not finite.
    #[error("invalid calibration: non-finite landmark")]
    NonFinite,
}

/// Millimetres per image pixel, given two points a ring radius apart.
///
/// # Errors
///
/// [`CalibrationError`] if the points coincide or the diameter is unusable.
pub fn mm_per_pixel(ring_diameter_mm: f64, a: Point, b: Point) -> Result<f64, CalibrationError> {
    if !ring_diameter_mm.is_finite() || ring_diameter_mm <= 0.0 {
        return Err(CalibrationError::RingDiameter(ring_diameter_mm));
    }
    let d = a.dist(b);
    if !d.is_finite() {
        return Err(CalibrationError::NonFinite);
    }
    if d <= f64::EPSILON {
        return Err(CalibrationError::CoincidentLandmarks);
    }
    Ok(ring_diameter_mm / 2.0 / d)
}

/// Fovea, ring edge and ONH centre, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkTriple {
    pub fovea: Point,
    pub ring: Point,
    pub onh: Point,
}

/// Result of a calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OnhEstimate {
    /// Laterality implied by the landmarks.
    pub eye: Eye,
    /// Horizontal ONH offset in degrees, signed as displayed for `eye`.
    pub onhx_deg: f64,
    /// Vertical ONH offset in degrees.
    pub onhy_deg: f64,
}

impl OnhEstimate {
    /// Rounded, clamped stored-frame `(onhx, onhy)`.
    #[must_use]
    pub fn rounded(&self) -> (i32, i32) {
        let stored_x = match self.eye {
            Eye::Left => self.onhx_deg,
            Eye::Right => -self.onhx_deg,
        };
        // Finite by construction; the fallbacks only guard the type.
        let onhx = clamp_degrees(Param::Onhx, stored_x).unwrap_or(Param::Onhx.bounds().1);
        let onhy = clamp_degrees(Param::Onhy, self.onhy_deg).unwrap_or(0);
        (onhx, onhy)
    }

    /// `params` with eye, onhx and onhy replaced by this estimate.
    #[must_use]
    pub fn apply_to(&self, params: AnatomicalParameters) -> AnatomicalParameters {
        let (onhx, onhy) = self.rounded();
        AnatomicalParameters { eye: self.eye, onhx, onhy, raphe: params.raphe }.clamped()
    }

    /// Label for the horizontal value, e.g. `"-15° (-15.23)"`.
    #[must_use]
    pub fn onhx_label(&self) -> String {
        degree_label(self.onhx_deg)
    }

    /// Label for the vertical value.
    #[must_use]
    pub fn onhy_label(&self) -> String {
        degree_label(self.onhy_deg)
    }
}

fn degree_label(deg: f64) -> String {
    format!("{deg:.0}\u{b0} ({deg:.2})")
}

/// An ONH imaged left of the fovea belongs to a left eye.
fn eye_from_landmarks(fovea: Point, onh: Point) -> Eye {
    if fovea.x > onh.x { Eye::Left } else { Eye::Right }
}

fn ensure_finite(points: &[Point]) -> Result<(), CalibrationError> {
    if points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
        Ok(())
    } else {
        Err(CalibrationError::NonFinite)
    }
}

/// Estimate from fovea, ring edge and ONH centre.
///
/// # Errors
///
/// [`CalibrationError`] if the ring edge sits on the ONH centre, a point is
/// not finite, or the ring diameter is unusable.
pub fn estimate_from_triple(triple: &LandmarkTriple, ring_diameter_mm: f64) -> Result<OnhEstimate, CalibrationError> {
    ensure_finite(&[triple.fovea, triple.ring, triple.onh])?;
    let scale = mm_per_pixel(ring_diameter_mm, triple.ring, triple.onh)?;
    let (p0, p2) = (triple.fovea, triple.onh);
    let hyp = scale * p0.dist(p2);
    let theta = (p2.y - p0.y).atan2(p0.x - p2.x);
    let estimate = OnhEstimate {
        eye: eye_from_landmarks(p0, p2),
        onhx_deg: to_vf(-hyp * theta.cos()),
        onhy_deg: to_vf(-hyp * theta.sin()),
    };
    tracing::debug!(?estimate, scale, "calibration from landmark triple");
    Ok(estimate)
}

/// Estimate from fovea and ONH centre, with the scale set by `scale_pair`.
///
/// # Errors
///
/// [`CalibrationError`] if the scale pair coincides, a point is not finite, or
/// the ring diameter is unusable.
pub fn estimate_direct(
    fovea: Point,
    scale_pair: (Point, Point),
    onh: Point,
    ring_diameter_mm: f64,
) -> Result<OnhEstimate, CalibrationError> {
    ensure_finite(&[fovea, scale_pair.0, scale_pair.1, onh])?;
    let scale = mm_per_pixel(ring_diameter_mm, scale_pair.0, scale_pair.1)?;
    let estimate = OnhEstimate {
        eye: eye_from_landmarks(fovea, onh),
        onhx_deg: to_vf((onh.x - fovea.x) * scale),
        onhy_deg: to_vf((fovea.y - onh.y) * scale),
    };
    tracing::debug!(?estimate, scale, "calibration from direct landmarks");
    Ok(estimate)
}

// =============================================================
// Click cycle
// =============================================================

/// Which landmark the next click records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationStep {
    #[default]
    GetFovea,
    GetRing,
    GetOnh,
}

impl CalibrationStep {
    /// The step after this one, wrapping back to the fovea.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::GetFovea => Self::GetRing,
            Self::GetRing => Self::GetOnh,
            Self::GetOnh => Self::GetFovea,
        }
    }

    /// Prompt shown while waiting for this click.
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::GetFovea => "Click the fovea",
            Self::GetRing => "Click the edge of the scan ring",
            Self::GetOnh => "Click the centre of the optic nerve head",
        }
    }
}

/// Collects the three landmark clicks in order.
#[derive(Debug, Clone, Default)]
pub struct LandmarkCollector {
    step: CalibrationStep,
    points: Vec<Point>,
}

impl LandmarkCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn step(&self) -> CalibrationStep {
        self.step
    }

    /// Points recorded so far in the current cycle (at most three).
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Record a click. A fovea click starts a fresh cycle.
    ///
    /// Returns the completed triple on the third click.
    pub fn click(&mut self, at: Point) -> Option<LandmarkTriple> {
        if self.step == CalibrationStep::GetFovea {
            self.points.clear();
        }
        self.points.push(at);
        tracing::debug!(step = ?self.step, x = at.x, y = at.y, "landmark recorded");
        self.step = self.step.next();
        match self.points.as_slice() {
            &[fovea, ring, onh] => Some(LandmarkTriple { fovea, ring, onh }),
            _ => None,
        }
    }

    /// Forget all points and wait for the fovea again.
    pub fn reset(&mut self) {
        self.step = CalibrationStep::GetFovea;
        self.points.clear();
    }
}
