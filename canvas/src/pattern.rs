//! Test-location grids and sector partition schemes.
//!
//! Grids are given in the left-eye frame in visual-field degrees, `y` up. A
//! right eye is drawn mirrored. Grid order is the order of entries in every
//! sector table cell for that pattern.

#[cfg(test)]
#[path = "pattern_test.rs"]
mod pattern_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{GARWAY_HEATH_COLORS, THIRTY_DEGREE_COLORS};

/// 24-2 locations with the two blind-spot points removed.
const GRID_24_2: [(f64, f64); 52] = [
    (9.0, -21.0), (3.0, -21.0), (-3.0, -21.0), (-9.0, -21.0),
    (15.0, -15.0), (9.0, -15.0), (3.0, -15.0), (-3.0, -15.0), (-9.0, -15.0), (-15.0, -15.0),
    (21.0, -9.0), (15.0, -9.0), (9.0, -9.0), (3.0, -9.0), (-3.0, -9.0), (-9.0, -9.0), (-15.0, -9.0), (-21.0, -9.0),
    (27.0, -3.0), (21.0, -3.0), (15.0, -3.0), (9.0, -3.0), (3.0, -3.0), (-3.0, -3.0), (-9.0, -3.0), (-21.0, -3.0),
    (27.0, 3.0), (21.0, 3.0), (15.0, 3.0), (9.0, 3.0), (3.0, 3.0), (-3.0, 3.0), (-9.0, 3.0), (-21.0, 3.0),
    (21.0, 9.0), (15.0, 9.0), (9.0, 9.0), (3.0, 9.0), (-3.0, 9.0), (-9.0, 9.0), (-15.0, 9.0), (-21.0, 9.0),
    (15.0, 15.0), (9.0, 15.0), (3.0, 15.0), (-3.0, 15.0), (-9.0, 15.0), (-15.0, 15.0),
    (9.0, 21.0), (3.0, 21.0), (-3.0, 21.0), (-9.0, 21.0),
];

/// G locations, central 30°.
const GRID_G: [(f64, f64); 59] = [
    (-8.0, 26.0), (8.0, 26.0),
    (-20.0, 20.0), (-12.0, 20.0), (-4.0, 20.0), (4.0, 20.0), (12.0, 20.0), (20.0, 20.0),
    (-26.0, 14.0), (-14.0, 14.0), (-8.0, 14.0), (-2.0, 14.0), (2.0, 14.0), (8.0, 14.0), (14.0, 14.0), (26.0, 14.0),
    (-20.0, 8.0), (-12.0, 8.0), (-4.0, 8.0), (4.0, 8.0), (12.0, 8.0), (20.0, 8.0),
    (-8.0, 4.0), (-2.0, 4.0), (2.0, 4.0), (8.0, 4.0),
    (-26.0, 2.0), (14.0, 2.0), (22.0, 2.0),
    (0.0, 0.0),
    (-26.0, -2.0), (14.0, -2.0), (22.0, -2.0),
    (-8.0, -4.0), (-2.0, -4.0), (2.0, -4.0), (8.0, -4.0),
    (-20.0, -8.0), (-12.0, -8.0), (-4.0, -8.0), (4.0, -8.0), (12.0, -8.0), (20.0, -8.0),
    (-26.0, -14.0), (-14.0, -14.0), (-8.0, -14.0), (-2.0, -14.0), (2.0, -14.0), (8.0, -14.0), (14.0, -14.0), (26.0, -14.0),
    (-20.0, -20.0), (-12.0, -20.0), (-4.0, -20.0), (4.0, -20.0), (12.0, -20.0), (20.0, -20.0),
    (-8.0, -26.0), (8.0, -26.0),
];

/// Visual-field test pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TestPattern {
    #[default]
    #[serde(rename = "24-2")]
    P24_2,
    #[serde(rename = "G")]
    G,
}

impl TestPattern {
    pub const ALL: [Self; 2] = [Self::P24_2, Self::G];

    /// Ordered test locations `(x, y)` in degrees, left-eye frame.
    #[must_use]
    pub fn grid(self) -> &'static [(f64, f64)] {
        match self {
            Self::P24_2 => &GRID_24_2,
            Self::G => &GRID_G,
        }
    }

    #[must_use]
    pub fn location_count(self) -> usize {
        self.grid().len()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P24_2 => "24-2",
            Self::G => "G",
        }
    }
}

impl fmt::Display for TestPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TestPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24-2" | "242" => Ok(Self::P24_2),
            "G" | "g" => Ok(Self::G),
            other => Err(format!("unknown test pattern '{other}' (expected '24-2' or 'G')")),
        }
    }
}

/// An angular wedge around the ONH, in TSNIT degrees.
///
/// TSNIT degrees start at temporal (0°) and run through superior (90°), nasal
/// (180°) and inferior (270°).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start_deg: f64,
    pub end_deg: f64,
}

impl Wedge {
    /// Angular width in degrees.
    #[must_use]
    pub fn span(&self) -> f64 {
        (self.end_deg - self.start_deg).rem_euclid(360.0)
    }

    /// Bisector in TSNIT degrees, normalised to `[0, 360)`.
    #[must_use]
    pub fn mid_deg(&self) -> f64 {
        (self.start_deg + self.span() / 2.0).rem_euclid(360.0)
    }
}

/// How the ONH circumference is divided into sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Twelve uniform 30° wedges centred on multiples of 30°.
    #[default]
    Thirty,
    /// Garway-Heath: T, TS, NS, N, NI, TI.
    GarwayHeath,
}

/// Garway-Heath boundaries in TSNIT degrees, in sector order.
const GARWAY_HEATH_WEDGES: [(f64, f64); 6] =
    [(310.0, 40.0), (40.0, 80.0), (80.0, 120.0), (120.0, 230.0), (230.0, 270.0), (270.0, 310.0)];

impl Partition {
    pub const ALL: [Self; 2] = [Self::Thirty, Self::GarwayHeath];

    #[must_use]
    pub fn sector_count(self) -> usize {
        match self {
            Self::Thirty => THIRTY_DEGREE_COLORS.len(),
            Self::GarwayHeath => GARWAY_HEATH_COLORS.len(),
        }
    }

    /// Display colour for `sector`, if it exists in this scheme.
    #[must_use]
    pub fn color(self, sector: u8) -> Option<&'static str> {
        let palette: &[&'static str] = match self {
            Self::Thirty => &THIRTY_DEGREE_COLORS,
            Self::GarwayHeath => &GARWAY_HEATH_COLORS,
        };
        palette.get(usize::from(sector)).copied()
    }

    /// The wedges of this scheme, indexed by sector.
    #[must_use]
    pub fn wedges(self) -> Vec<Wedge> {
        match self {
            Self::Thirty => (0..12)
                .map(|i| {
                    let centre = f64::from(i) * 30.0;
                    Wedge { start_deg: (centre - 15.0).rem_euclid(360.0), end_deg: centre + 15.0 }
                })
                .collect(),
            Self::GarwayHeath => GARWAY_HEATH_WEDGES
                .iter()
                .map(|&(start_deg, end_deg)| Wedge { start_deg, end_deg })
                .collect(),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thirty => "thirty",
            Self::GarwayHeath => "garway_heath",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thirty" | "30" => Ok(Self::Thirty),
            "garway_heath" | "garway-heath" | "gh" => Ok(Self::GarwayHeath),
            other => Err(format!("unknown partition '{other}' (expected 'thirty' or 'garway_heath')")),
        }
    }
}
