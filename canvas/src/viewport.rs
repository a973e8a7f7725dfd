//! Virtual-to-device coordinate transform.
//!
//! Everything is laid out on a fixed 1000×588 virtual canvas. The device canvas
//! keeps the same aspect ratio and is as large as the window allows. After each
//! resize the aspect ratio is re-derived from the rounded device size, so later
//! scaling agrees with whole pixels. Repeated resizes therefore drift slightly
//! from the nominal ratio; this is kept as-is.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{VIRTUAL_H, VIRTUAL_W};
use crate::params::round_half_up;

/// A point in either virtual or device space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn dist(self, other: Point) -> f64 {
        self.dist_sq(other).sqrt()
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn dist_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Device canvas size and the aspect ratio used for vertical scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    device_w: f64,
    device_h: f64,
    aspect: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { device_w: VIRTUAL_W, device_h: VIRTUAL_H, aspect: VIRTUAL_W / VIRTUAL_H }
    }
}

impl Viewport {
    #[must_use]
    pub fn device_width(&self) -> f64 {
        self.device_w
    }

    #[must_use]
    pub fn device_height(&self) -> f64 {
        self.device_h
    }

    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    /// Fit the device canvas into `new_w` × `new_h` pixels.
    ///
    /// Returns `false` (and leaves the viewport untouched) when the available
    /// area has no usable width.
    pub fn resize(&mut self, new_w: f64, new_h: f64) -> bool {
        let width = new_w.min(new_h * self.aspect);
        let height = round_half_up(width / self.aspect);
        if !new_w.is_finite() || !new_h.is_finite() || width <= 0.0 || height <= 0.0 {
            tracing::warn!(new_w, new_h, "ignoring resize to an empty canvas");
            return false;
        }
        self.device_w = width;
        self.device_h = height;
        self.aspect = width / height;
        true
    }

    /// Virtual x (or any horizontal length) to device pixels.
    ///
    /// All conversions round halves up, so `-0.5` becomes `0`.
    #[must_use]
    pub fn scale(&self, v: f64) -> f64 {
        round_half_up(v / VIRTUAL_W * self.device_w)
    }

    /// Virtual y to device pixels.
    #[must_use]
    pub fn yscale(&self, v: f64) -> f64 {
        round_half_up(v / VIRTUAL_H * self.device_w / self.aspect)
    }

    /// Device x to virtual units.
    #[must_use]
    pub fn unscale(&self, px: f64) -> f64 {
        round_half_up(px * VIRTUAL_W / self.device_w)
    }

    /// Device y to virtual units.
    #[must_use]
    pub fn yunscale(&self, px: f64) -> f64 {
        round_half_up(px * VIRTUAL_H / self.device_w * self.aspect)
    }

    /// Like [`Self::scale`] but centred on a pixel, for crisp 1-px lines.
    #[must_use]
    pub fn midpx_scale(&self, v: f64) -> f64 {
        round_half_up(v / VIRTUAL_W * self.device_w - 0.5) + 0.5
    }

    /// Like [`Self::yscale`] but centred on a pixel.
    #[must_use]
    pub fn midpx_yscale(&self, v: f64) -> f64 {
        round_half_up(v / VIRTUAL_H * self.device_w / self.aspect - 0.5) + 0.5
    }

    /// Virtual point to device pixels.
    #[must_use]
    pub fn to_device(&self, virt: Point) -> Point {
        Point::new(self.scale(virt.x), self.yscale(virt.y))
    }

    /// Device point to virtual units.
    #[must_use]
    pub fn to_virtual(&self, device: Point) -> Point {
        Point::new(self.unscale(device.x), self.yunscale(device.y))
    }
}
