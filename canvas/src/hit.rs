#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::viewport::Point;

/// What an interactive anchor stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionLabel {
    /// A test-location dot, by grid index.
    Location(usize),
    /// A wedge of the TSNIT key pie, by sector.
    KeyWedge(u8),
    /// The blind-spot marker.
    Onh,
    /// The ONH x handle on the horizontal axis.
    OnhX,
    /// The ONH y handle on the vertical axis.
    OnhY,
    /// The free end of the raphe line.
    RapheEnd,
}

/// An anchor drawn this frame, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractiveRegion {
    pub pos: Point,
    pub label: RegionLabel,
}

impl InteractiveRegion {
    #[must_use]
    pub fn new(x: f64, y: f64, label: RegionLabel) -> Self {
        Self { pos: Point::new(x, y), label }
    }
}

/// Result of a nearest-anchor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// `None` when there was nothing to hit.
    pub label: Option<RegionLabel>,
    pub dist_sq: f64,
}

impl Nearest {
    /// The empty result: no label, infinitely far away.
    pub const NONE: Self = Self { label: None, dist_sq: f64::INFINITY };

    /// The label, if it lies within `max_dist_sq`.
    #[must_use]
    pub fn within(&self, max_dist_sq: f64) -> Option<RegionLabel> {
        self.label.filter(|_| self.dist_sq <= max_dist_sq)
    }
}

/// Find the anchor closest to `pointer`.
///
/// Ties go to the earliest region in `regions`.
#[must_use]
pub fn nearest(pointer: Point, regions: &[InteractiveRegion]) -> Nearest {
    let mut best = Nearest::NONE;
    for region in regions {
        let d = pointer.dist_sq(region.pos);
        if d < best.dist_sq {
            best = Nearest { label: Some(region.label), dist_sq: d };
        }
    }
    best
}
