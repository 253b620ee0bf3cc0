//! Transverse Mercator projection between Airy 1830 latitude/longitude and
//! National Grid Easting/Northing.
//!
//! The forward direction is a closed-form series evaluation. The inverse
//! direction has to solve the meridional arc for latitude and does so by
//! fixed-point iteration, bounded by [`MAX_ITERATIONS`].

use tracing::trace;

use super::ellipsoid::{AIRY_1830, E0, F0, LAT0_DEG, LON0_DEG, N0};
use super::{GeodeticCoordinate, PlanarGridCoordinate};
use crate::error::{Error, Result};

/// Upper bound on latitude refinement rounds in the inverse projection.
pub const MAX_ITERATIONS: usize = 100;

/// Residual meridional arc at which the inverse stops refining (0.01 mm).
const ARC_TOLERANCE_M: f64 = 1e-5;

/// Meridional arc from `lat0` to `lat` (radians), scaled by `F0`.
fn meridional_arc(lat: f64, lat0: f64) -> f64 {
    let n = AIRY_1830.n();
    let n2 = n * n;
    let n3 = n2 * n;
    let diff = lat - lat0;
    let sum = lat + lat0;

    let ma = (1.0 + n + (5.0 / 4.0) * n2 + (5.0 / 4.0) * n3) * diff;
    let mb = (3.0 * n + 3.0 * n2 + (21.0 / 8.0) * n3) * diff.sin() * sum.cos();
    let mc = ((15.0 / 8.0) * n2 + (15.0 / 8.0) * n3) * (2.0 * diff).sin() * (2.0 * sum).cos();
    let md = (35.0 / 24.0) * n3 * (3.0 * diff).sin() * (3.0 * sum).cos();

    AIRY_1830.b * F0 * (ma - mb + mc - md)
}

/// Radii of curvature at a latitude, both scaled by `F0`.
#[derive(Debug, Clone, Copy)]
struct Curvature {
    /// Transverse radius of curvature.
    nu: f64,
    /// Meridional radius of curvature.
    rho: f64,
    /// `nu / rho - 1`.
    eta2: f64,
}

impl Curvature {
    fn at(lat: f64) -> Self {
        let e2 = AIRY_1830.eccentricity_squared();
        let sin_lat = lat.sin();
        let k = 1.0 - e2 * sin_lat * sin_lat;
        let nu = AIRY_1830.a * F0 / k.sqrt();
        let rho = AIRY_1830.a * F0 * (1.0 - e2) / k.powf(1.5);
        Self {
            nu,
            rho,
            eta2: nu / rho - 1.0,
        }
    }
}

/// Project an Airy 1830 latitude/longitude onto the National Grid.
///
/// The result is not range checked; points far from Great Britain project
/// to large or negative values, which the grid reference encoder rejects.
#[must_use]
pub fn to_national_grid(coord: GeodeticCoordinate) -> PlanarGridCoordinate {
    let lat = coord.latitude_deg.to_radians();
    let lon = coord.longitude_deg.to_radians();
    let lat0 = LAT0_DEG.to_radians();
    let lon0 = LON0_DEG.to_radians();

    let (sin_lat, cos_lat) = lat.sin_cos();
    let Curvature { nu, rho, eta2 } = Curvature::at(lat);
    let m = meridional_arc(lat, lat0);

    let cos3 = cos_lat.powi(3);
    let cos5 = cos_lat.powi(5);
    let tan2 = lat.tan().powi(2);
    let tan4 = tan2 * tan2;

    let i = m + N0;
    let ii = (nu / 2.0) * sin_lat * cos_lat;
    let iii = (nu / 24.0) * sin_lat * cos3 * (5.0 - tan2 + 9.0 * eta2);
    let iiia = (nu / 720.0) * sin_lat * cos5 * (61.0 - 58.0 * tan2 + tan4);
    let iv = nu * cos_lat;
    let v = (nu / 6.0) * cos3 * (nu / rho - tan2);
    let vi = (nu / 120.0)
        * cos5
        * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

    let dl = lon - lon0;
    let northing = i + ii * dl.powi(2) + iii * dl.powi(4) + iiia * dl.powi(6);
    let easting = E0 + iv * dl + v * dl.powi(3) + vi * dl.powi(5);

    trace!(
        lat = coord.latitude_deg,
        lon = coord.longitude_deg,
        easting,
        northing,
        "projected onto national grid"
    );
    PlanarGridCoordinate::new(easting, northing)
}

/// Recover the Airy 1830 latitude/longitude of a National Grid point.
///
/// # Errors
///
/// Returns [`Error::Convergence`] if the latitude refinement does not settle,
/// which happens for non-finite input.
pub fn from_national_grid(point: PlanarGridCoordinate) -> Result<GeodeticCoordinate> {
    let lat0 = LAT0_DEG.to_radians();
    let lon0 = LON0_DEG.to_radians();
    let target = point.northing_m - N0;

    let mut lat = lat0;
    let mut m = 0.0;
    let mut settled = false;
    for _ in 0..MAX_ITERATIONS {
        lat += (target - m) / (AIRY_1830.a * F0);
        m = meridional_arc(lat, lat0);
        if (target - m).abs() < ARC_TOLERANCE_M {
            settled = true;
            break;
        }
    }
    if !settled {
        return Err(Error::Convergence {
            operation: "inverse meridional arc",
        });
    }

    let cos_lat = lat.cos();
    let Curvature { nu, rho, eta2 } = Curvature::at(lat);
    let tan_lat = lat.tan();
    let tan2 = tan_lat * tan_lat;
    let tan4 = tan2 * tan2;
    let tan6 = tan4 * tan2;
    let sec_lat = 1.0 / cos_lat;

    let vii = tan_lat / (2.0 * rho * nu);
    let viii = tan_lat / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
    let ix = tan_lat / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
    let x = sec_lat / nu;
    let xi = sec_lat / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
    let xii = sec_lat / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
    let xiia = sec_lat / (5040.0 * nu.powi(7))
        * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

    let de = point.easting_m - E0;
    let lat = lat - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
    let lon = lon0 + x * de - xi * de.powi(3) + xii * de.powi(5) - xiia * de.powi(7);

    Ok(GeodeticCoordinate::new(lat.to_degrees(), lon.to_degrees()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 52°39'27.2531"N 1°43'4.5177"E, the worked example in the OS guide.
    const OS_EXAMPLE: GeodeticCoordinate = GeodeticCoordinate::new(52.657_570_301_933, 1.717_921_580_442);

    #[test]
    fn test_true_origin() {
        let p = to_national_grid(GeodeticCoordinate::new(49.0, -2.0));
        assert!((p.easting_m - 400_000.0).abs() < 1e-3);
        assert!((p.northing_m + 100_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_os_worked_example_forward() {
        let p = to_national_grid(OS_EXAMPLE);
        assert!((p.easting_m - 651_409.903).abs() < 1e-3, "{p:?}");
        assert!((p.northing_m - 313_177.270).abs() < 1e-3, "{p:?}");
    }

    #[test]
    fn test_os_worked_example_inverse() {
        let c = from_national_grid(PlanarGridCoordinate::new(651_409.903, 313_177.270)).unwrap();
        assert!((c.latitude_deg - OS_EXAMPLE.latitude_deg).abs() < 1e-7, "{c:?}");
        assert!((c.longitude_deg - OS_EXAMPLE.longitude_deg).abs() < 1e-7, "{c:?}");
    }

    #[test]
    fn test_central_london() {
        let p = to_national_grid(GeodeticCoordinate::new(51.5074, -0.1278));
        assert!((p.easting_m - 529_915.826).abs() < 1e-2, "{p:?}");
        assert!((p.northing_m - 180_433.994).abs() < 1e-2, "{p:?}");
    }

    #[test]
    fn test_forward_is_deterministic() {
        let c = GeodeticCoordinate::new(55.9533, -3.1883);
        let first = to_national_grid(c);
        for _ in 0..10 {
            let again = to_national_grid(c);
            assert_eq!(first.easting_m.to_bits(), again.easting_m.to_bits());
            assert_eq!(first.northing_m.to_bits(), again.northing_m.to_bits());
        }
    }

    #[test]
    fn test_inverse_round_trip() {
        for &(lat, lon) in &[(50.0662, -5.7147), (57.1497, -2.0943), (60.15, -1.15)] {
            let p = to_national_grid(GeodeticCoordinate::new(lat, lon));
            let c = from_national_grid(p).unwrap();
            assert!((c.latitude_deg - lat).abs() < 1e-7);
            assert!((c.longitude_deg - lon).abs() < 1e-7);
        }
    }

    #[test]
    fn test_inverse_rejects_nan() {
        let err = from_national_grid(PlanarGridCoordinate::new(f64::NAN, f64::NAN)).unwrap_err();
        assert!(matches!(err, Error::Convergence { .. }));
    }
}
