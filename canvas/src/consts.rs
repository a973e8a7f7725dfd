//! Shared numeric constants for the canvas crate.

// ── Virtual canvas ──────────────────────────────────────────────

/// Logical canvas width. All layout is done in these units.
pub const VIRTUAL_W: f64 = 1000.0;

/// Logical canvas height.
pub const VIRTUAL_H: f64 = 588.0;

// ── Anatomical bounds ───────────────────────────────────────────

/// Stored (left-eye) ONH x bounds in degrees.
pub const ONHX_MIN: i32 = -18;
pub const ONHX_MAX: i32 = -12;

/// ONH y bounds in degrees (positive = ONH above the fovea on the retina).
pub const ONHY_MIN: i32 = -2;
pub const ONHY_MAX: i32 = 4;

/// Raphe angle bounds in degrees.
pub const RAPHE_MIN: i32 = 161;
pub const RAPHE_MAX: i32 = 181;

// ── Optics ──────────────────────────────────────────────────────

/// Schematic-eye nodal distance in mm.
pub const SCHEMATIC_NODAL_MM: f64 = 11.459;

/// Nodal length as a proportion of axial length.
pub const NODAL_PROPORTION: f64 = 17.0 / 22.6;

/// Diameter of the Spectralis peripapillary scan ring in mm.
pub const DEFAULT_RING_DIAMETER_MM: f64 = 3.5;

// ── Map layout (virtual units) ──────────────────────────────────

/// Virtual units per visual-field degree.
pub const UNITS_PER_DEG: f64 = 10.0;

/// x of the vertical axis line.
pub const Y_AXIS_X: f64 = 50.0;

/// Centre of the visual field plot (fixation).
pub const FIELD_CX: f64 = Y_AXIS_X + 30.0 * UNITS_PER_DEG;
pub const FIELD_CY: f64 = VIRTUAL_H / 2.0;

/// Radius of a test-location dot.
pub const DOT_RADIUS: f64 = 9.0 * UNITS_PER_DEG / 5.0;

/// Radius of the blind-spot marker, relative to a dot.
pub const ONH_MARKER_SCALE: f64 = 1.3;

/// Length of the drawn raphe line in degrees.
pub const RAPHE_LENGTH_DEG: f64 = 30.0;

/// Horizontal axis offset below fixation, in degrees.
pub const X_AXIS_OFFSET_DEG: f64 = 25.0;

/// Axis ticks run from -27 to 27 in steps of 6; y ticks stop at 21.
pub const TICK_LIMIT_DEG: i32 = 27;
pub const TICK_STEP_DEG: usize = 6;
pub const Y_TICK_LIMIT_DEG: i32 = 21;

/// TSNIT key pie.
pub const KEY_RADIUS: f64 = 35.0 * UNITS_PER_DEG / 3.0;
pub const KEY_CX: f64 = FIELD_CX + 32.0 * UNITS_PER_DEG + KEY_RADIUS;
pub const KEY_CY: f64 = FIELD_CY;

/// Vertical stretch applied to the key pie.
pub const KEY_Y_STRETCH: f64 = 1.3;

/// Radius of the ONH x/y axis handles.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Distance a hovered wedge is pushed out of the pie.
pub const KEY_EXPLODE: f64 = 10.0;

/// Fraction of the key radius at which a wedge's hit anchor sits.
pub const KEY_ANCHOR_FRACTION: f64 = 0.6;

// ── Calibration screen ──────────────────────────────────────────

/// Radius of a landmark marker on the calibration image.
pub const LANDMARK_RADIUS: f64 = 5.0;

// ── Palettes ────────────────────────────────────────────────────

/// One colour per 30° sector, temporal first, counter-clockwise through superior.
pub const THIRTY_DEGREE_COLORS: [&str; 12] = [
    "#00008F", "#0000EA", "#0047FF", "#00A2FF", "#00FEFF", "#5AFFA5", "#B5FF4A", "#FFED00", "#FF9200", "#FF3700",
    "#DB0000", "#800000",
];

/// Garway-Heath sectors: T, TS, NS, N, NI, TI.
pub const GARWAY_HEATH_COLORS: [&str; 6] = ["#1B9E77", "#D95F02", "#7570B3", "#E7298A", "#66A61E", "#E6AB02"];

/// Dot colour when no sector is available for the current parameters.
pub const UNKNOWN_SECTOR_COLOR: &str = "#BBBBBB";
