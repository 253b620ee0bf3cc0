//! `fieldrecorder` - GPS fixes to Ordnance Survey National Grid references
//!
//! This library converts latitude/longitude reported by a GPS receiver into
//! the two-letter British National Grid reference (e.g. `TQ 2991 8043`)
//! recorded against finds, permissions and detecting sessions, and converts
//! grid references back to latitude/longitude.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod geodesy;
pub mod gps;
pub mod gridref;
pub mod logging;
pub mod track;

pub use config::Config;
pub use convert::{
    convert_from_grid_reference, convert_to_grid_reference, ConversionOptions, Converter, Datum,
};
pub use error::{Error, Result};
pub use geodesy::{GeodeticCoordinate, PlanarGridCoordinate};
pub use gps::GpsFix;
pub use gridref::GridReference;
pub use logging::init_logging;
pub use track::{Track, TrackPolicy};
