//! Visual-field sector map engine.
//!
//! Given where the optic nerve head (ONH) sits relative to the fovea, which eye
//! is examined, and the angle of the retinal raphe, this crate shows which ONH
//! sector each visual-field test location projects to. It is compiled to
//! WebAssembly and runs in the browser; the same core also links natively for
//! the `onhmap` command line tool.
//!
//! The host JavaScript layer only wires DOM events to [`web::MapApp`]. All
//! session state lives in [`engine::ViewModel`], which is testable without a
//! browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::ViewModel`] |
//! | [`params`] | Eye laterality, ONH position, raphe angle and their bounds |
//! | [`sector`] | Sector table asset and lookup |
//! | [`calibration`] | ONH position from landmarks on a fundus or OCT image |
//! | [`viewport`] | Virtual-to-device coordinate transform |
//! | [`hit`] | Nearest interactive region |
//! | [`input`] | Drag state machine, pointer-to-parameter math and hover |
//! | [`layout`] | Per-frame geometry shared by rendering and hit-testing |
//! | [`render`] | Draws a frame to the 2D canvas |
//! | [`pattern`] | Test-location grids and sector partitions |
//! | [`ui_port`] | Form fields behind a port |
//! | [`dom`] | [`ui_port::UiPort`] over DOM elements |
//! | [`image`] | Decoding the calibration image |
//! | [`config`] | Session settings from the host page |
//! | [`consts`] | Shared numeric constants (bounds, optics, layout, palettes) |
//! | [`web`] | JavaScript entry point for the page |

pub mod calibration;
pub mod config;
pub mod consts;
pub mod dom;
pub mod engine;
pub mod hit;
pub mod image;
pub mod input;
pub mod layout;
pub mod params;
pub mod pattern;
pub mod render;
pub mod sector;
pub mod ui_port;
pub mod viewport;
pub mod web;
