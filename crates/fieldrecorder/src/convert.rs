//! Latitude/longitude to grid reference conversion.
//!
//! [`Converter`] chains the optional datum shift, the projection and the
//! grid reference encoder. It holds nothing but its options, so one value can
//! be shared freely between threads.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::geodesy::{self, helmert, GeodeticCoordinate};
use crate::gridref::{self, GridReference};

/// How GPS positions are related to the OSGB36 datum before projecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Datum {
    /// Treat input as already on Airy 1830. Off by a hundred metres or so
    /// for raw GPS, but consistent with previously recorded references.
    #[default]
    Airy,
    /// Apply the OS Helmert transform from WGS84 first.
    Helmert,
}

impl std::fmt::Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Airy => write!(f, "airy"),
            Self::Helmert => write!(f, "helmert"),
        }
    }
}

/// Options for a [`Converter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Datum handling for input coordinates.
    pub datum: Datum,
}

/// Converts between GPS coordinates and National Grid references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Converter {
    options: ConversionOptions,
}

impl Converter {
    /// Create a converter with the given options.
    #[must_use]
    pub const fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// Create a converter using the given datum handling.
    #[must_use]
    pub const fn with_datum(datum: Datum) -> Self {
        Self::new(ConversionOptions { datum })
    }

    /// The options this converter was built with.
    #[must_use]
    pub fn options(&self) -> ConversionOptions {
        self.options
    }

    /// Convert a coordinate to a grid reference.
    ///
    /// Returns `Ok(None)` when the point is outside the National Grid.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCoordinate`] if the degrees are not
    /// finite or not within their valid ranges.
    pub fn to_grid_reference(&self, coord: GeodeticCoordinate) -> Result<Option<GridReference>> {
        let coord = GeodeticCoordinate::checked(coord.latitude_deg, coord.longitude_deg)?;
        let on_airy = match self.options.datum {
            Datum::Airy => coord,
            Datum::Helmert => helmert::wgs84_to_osgb36(coord),
        };

        let reference = gridref::encode(geodesy::to_national_grid(on_airy));
        match &reference {
            Some(r) => debug!(
                lat = coord.latitude_deg,
                lon = coord.longitude_deg,
                datum = %self.options.datum,
                grid_ref = %r,
                "converted to grid reference"
            ),
            None => debug!(
                lat = coord.latitude_deg,
                lon = coord.longitude_deg,
                "coordinate is outside the national grid"
            ),
        }
        Ok(reference)
    }

    /// Latitude/longitude of the centre of a grid reference's cell.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Convergence`] if the inverse projection fails.
    pub fn to_geodetic(&self, reference: &GridReference) -> Result<GeodeticCoordinate> {
        let on_airy = geodesy::from_national_grid(reference.centre())?;
        Ok(match self.options.datum {
            Datum::Airy => on_airy,
            Datum::Helmert => helmert::osgb36_to_wgs84(on_airy),
        })
    }
}

/// Convert a latitude/longitude in degrees to a grid reference.
///
/// No datum shift is applied. `Ok(None)` means the point is outside the
/// National Grid; callers typically leave the field blank in that case.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidCoordinate`] for non-finite or
/// out-of-range degrees.
///
/// # Examples
///
/// ```
/// let r = fieldrecorder::convert_to_grid_reference(51.5074, -0.1278).unwrap();
/// assert_eq!(r.unwrap().to_string(), "TQ 2991 8043");
///
/// // Paris is off the grid.
/// assert!(fieldrecorder::convert_to_grid_reference(48.8566, 2.3522).unwrap().is_none());
/// ```
pub fn convert_to_grid_reference(
    latitude_deg: f64,
    longitude_deg: f64,
) -> Result<Option<GridReference>> {
    Converter::default().to_grid_reference(GeodeticCoordinate::new(latitude_deg, longitude_deg))
}

/// Parse a grid reference and return the latitude/longitude of its centre.
///
/// # Errors
///
/// Returns a parse error for malformed references or an unknown square.
pub fn convert_from_grid_reference(reference: &str) -> Result<GeodeticCoordinate> {
    let reference: GridReference = reference.parse()?;
    Converter::default().to_geodetic(&reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn grid(lat: f64, lon: f64) -> Option<String> {
        convert_to_grid_reference(lat, lon)
            .unwrap()
            .map(|r| r.to_string())
    }

    #[test]
    fn test_central_london() {
        assert_eq!(grid(51.5074, -0.1278).as_deref(), Some("TQ 2991 8043"));
    }

    #[test]
    fn test_os_worked_example() {
        assert_eq!(
            grid(52.657_570_301_933, 1.717_921_580_442).as_deref(),
            Some("TG 5140 1317")
        );
    }

    #[test]
    fn test_regional_squares() {
        assert_eq!(grid(50.0662, -5.7147).as_deref(), Some("SW 3420 2513"));
        assert_eq!(grid(55.9533, -3.1883).as_deref(), Some("NT 2580 7399"));
        assert_eq!(grid(57.1497, -2.0943).as_deref(), Some("NJ 9429 0651"));
        assert_eq!(grid(60.15, -1.15).as_deref(), Some("HU 4719 4085"));
    }

    #[test]
    fn test_true_origin_is_out_of_coverage() {
        assert!(grid(49.0, -2.0).is_none());
    }

    #[test]
    fn test_paris_is_out_of_coverage() {
        assert!(grid(48.8566, 2.3522).is_none());
    }

    #[test]
    fn test_far_away_is_out_of_coverage() {
        assert!(grid(-33.8688, 151.2093).is_none());
        assert!(grid(90.0, 0.0).is_none());
    }

    #[test]
    fn test_invalid_degrees_are_errors() {
        let err = convert_to_grid_reference(91.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { .. }));
        assert!(convert_to_grid_reference(51.0, 181.0).is_err());
        assert!(convert_to_grid_reference(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_deterministic() {
        let first = convert_to_grid_reference(53.4808, -2.2426).unwrap();
        for _ in 0..5 {
            assert_eq!(convert_to_grid_reference(53.4808, -2.2426).unwrap(), first);
        }
    }

    #[test]
    fn test_helmert_datum_shifts_london() {
        let converter = Converter::with_datum(Datum::Helmert);
        let r = converter
            .to_grid_reference(GeodeticCoordinate::new(51.5074, -0.1278))
            .unwrap()
            .unwrap();
        assert_eq!(r.to_string(), "TQ 3002 8038");
    }

    #[test]
    fn test_grid_to_latlon_to_grid() {
        for text in ["TQ 2991 8043", "SW 3420 2513", "HU 4719 4085", "NJ 9429 0651"] {
            let coord = convert_from_grid_reference(text).unwrap();
            let back = grid(coord.latitude_deg, coord.longitude_deg).unwrap();
            assert_eq!(back, text);
        }
    }

    #[test]
    fn test_helmert_round_trip_keeps_square() {
        let converter = Converter::with_datum(Datum::Helmert);
        let r: GridReference = "SU 1234 5678".parse().unwrap();
        let coord = converter.to_geodetic(&r).unwrap();
        let back = converter.to_grid_reference(coord).unwrap().unwrap();
        assert_eq!(back.square(), "SU");
        assert!(back.easting_offset().abs_diff(1234) <= 1);
        assert!(back.northing_offset().abs_diff(5678) <= 1);
    }

    #[test]
    fn test_from_grid_reference_rejects_garbage() {
        let err = convert_from_grid_reference("not a grid ref").unwrap_err();
        assert!(err.is_grid_reference_error());
    }

    #[test]
    fn test_datum_display_and_serde() {
        assert_eq!(Datum::Airy.to_string(), "airy");
        assert_eq!(Datum::Helmert.to_string(), "helmert");
        assert_eq!(serde_json::to_string(&Datum::Helmert).unwrap(), "\"helmert\"");
        assert_eq!(Datum::default(), Datum::Airy);
    }

    #[test]
    fn test_converter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
    }
}
