//! Geodetic primitives for the Ordnance Survey National Grid.
//!
//! This module holds the coordinate value types, the reference ellipsoids,
//! the Transverse Mercator projection used by OSGB36 and the optional
//! Helmert datum shift between WGS84 and OSGB36.

pub mod ellipsoid;
pub mod helmert;
pub mod projection;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use ellipsoid::{Ellipsoid, AIRY_1830, WGS84};
pub use projection::{from_national_grid, to_national_grid};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticCoordinate {
    /// Latitude in degrees, positive north.
    pub latitude_deg: f64,
    /// Longitude in degrees, positive east.
    pub longitude_deg: f64,
}

impl GeodeticCoordinate {
    /// Create a coordinate without range checking.
    #[must_use]
    pub const fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    /// Create a coordinate, rejecting non-finite or out-of-range degrees.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] unless `-90 <= latitude <= 90`
    /// and `-180 <= longitude <= 180`.
    pub fn checked(latitude_deg: f64, longitude_deg: f64) -> Result<Self> {
        let coord = Self::new(latitude_deg, longitude_deg);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(Error::invalid_coordinate(latitude_deg, longitude_deg))
        }
    }

    /// Whether both components are finite and inside their degree ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude_deg)
            && (-180.0..=180.0).contains(&self.longitude_deg)
    }
}

/// An Easting/Northing pair in metres on the National Grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarGridCoordinate {
    /// Metres east of the false origin.
    pub easting_m: f64,
    /// Metres north of the false origin.
    pub northing_m: f64,
}

impl PlanarGridCoordinate {
    /// Create a planar coordinate.
    #[must_use]
    pub const fn new(easting_m: f64, northing_m: f64) -> Self {
        Self {
            easting_m,
            northing_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_accepts_extremes() {
        assert!(GeodeticCoordinate::checked(90.0, 180.0).is_ok());
        assert!(GeodeticCoordinate::checked(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        let err = GeodeticCoordinate::checked(90.5, 0.0).unwrap_err();
        assert!(err.is_invalid_coordinate());
        assert!(GeodeticCoordinate::checked(0.0, -180.01).is_err());
    }

    #[test]
    fn test_checked_rejects_non_finite() {
        assert!(GeodeticCoordinate::checked(f64::NAN, 0.0).is_err());
        assert!(GeodeticCoordinate::checked(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_coordinate_serialization() {
        let coord = GeodeticCoordinate::new(51.5, -0.12);
        let json = serde_json::to_string(&coord).unwrap();
        assert!(json.contains("latitude_deg"));
        let back: GeodeticCoordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(coord, back);
    }
}
