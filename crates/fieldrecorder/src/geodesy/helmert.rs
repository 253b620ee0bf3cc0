//! Seven-parameter Helmert datum shift between WGS84 and OSGB36.
//!
//! GPS receivers report positions on WGS84. The National Grid is defined on
//! OSGB36 (Airy 1830), roughly 100 m away in southern England. Projecting a
//! GPS fix without this shift is the default behaviour of the converter; this
//! stage is opt-in and always runs before the projection, never inside it.
//!
//! The published OS parameters give results within a few metres. Heights are
//! taken as zero on both ellipsoids.

use super::ellipsoid::{Ellipsoid, AIRY_1830, WGS84};
use super::GeodeticCoordinate;

/// Helmert transformation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmertParams {
    /// Translation along X, metres.
    pub tx: f64,
    /// Translation along Y, metres.
    pub ty: f64,
    /// Translation along Z, metres.
    pub tz: f64,
    /// Scale change, parts per million.
    pub s_ppm: f64,
    /// Rotation about X, arc-seconds.
    pub rx_sec: f64,
    /// Rotation about Y, arc-seconds.
    pub ry_sec: f64,
    /// Rotation about Z, arc-seconds.
    pub rz_sec: f64,
}

impl HelmertParams {
    /// The reverse transformation (small-angle approximation).
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            s_ppm: -self.s_ppm,
            rx_sec: -self.rx_sec,
            ry_sec: -self.ry_sec,
            rz_sec: -self.rz_sec,
        }
    }
}

/// WGS84 to OSGB36 parameters published by Ordnance Survey.
pub const WGS84_TO_OSGB36: HelmertParams = HelmertParams {
    tx: -446.448,
    ty: 125.157,
    tz: -542.060,
    s_ppm: 20.4894,
    rx_sec: -0.1502,
    ry_sec: -0.2470,
    rz_sec: -0.8421,
};

/// Rounds of latitude refinement when leaving Cartesian space.
const LATITUDE_ROUNDS: usize = 10;

/// Geocentric Cartesian coordinates, metres.
#[derive(Debug, Clone, Copy)]
struct Cartesian {
    x: f64,
    y: f64,
    z: f64,
}

fn to_cartesian(coord: GeodeticCoordinate, ellipsoid: Ellipsoid) -> Cartesian {
    let lat = coord.latitude_deg.to_radians();
    let lon = coord.longitude_deg.to_radians();
    let e2 = ellipsoid.eccentricity_squared();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    Cartesian {
        x: nu * cos_lat * lon.cos(),
        y: nu * cos_lat * lon.sin(),
        z: (1.0 - e2) * nu * sin_lat,
    }
}

fn from_cartesian(point: Cartesian, ellipsoid: Ellipsoid) -> GeodeticCoordinate {
    let e2 = ellipsoid.eccentricity_squared();
    let p = point.x.hypot(point.y);
    let mut lat = point.z.atan2(p * (1.0 - e2));
    for _ in 0..LATITUDE_ROUNDS {
        let sin_lat = lat.sin();
        let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        lat = (point.z + e2 * nu * sin_lat).atan2(p);
    }
    GeodeticCoordinate::new(lat.to_degrees(), point.y.atan2(point.x).to_degrees())
}

fn apply(point: Cartesian, params: &HelmertParams) -> Cartesian {
    let s1 = 1.0 + params.s_ppm * 1e-6;
    let rx = (params.rx_sec / 3600.0).to_radians();
    let ry = (params.ry_sec / 3600.0).to_radians();
    let rz = (params.rz_sec / 3600.0).to_radians();
    let Cartesian { x, y, z } = point;
    Cartesian {
        x: params.tx + s1 * x - rz * y + ry * z,
        y: params.ty + rz * x + s1 * y - rx * z,
        z: params.tz - ry * x + rx * y + s1 * z,
    }
}

/// Shift a coordinate between ellipsoids with the given parameters.
#[must_use]
pub fn transform(
    coord: GeodeticCoordinate,
    from: Ellipsoid,
    to: Ellipsoid,
    params: &HelmertParams,
) -> GeodeticCoordinate {
    from_cartesian(apply(to_cartesian(coord, from), params), to)
}

/// Shift a WGS84 position onto OSGB36 (Airy 1830).
#[must_use]
pub fn wgs84_to_osgb36(coord: GeodeticCoordinate) -> GeodeticCoordinate {
    transform(coord, WGS84, AIRY_1830, &WGS84_TO_OSGB36)
}

/// Shift an OSGB36 (Airy 1830) position back onto WGS84.
#[must_use]
pub fn osgb36_to_wgs84(coord: GeodeticCoordinate) -> GeodeticCoordinate {
    transform(coord, AIRY_1830, WGS84, &WGS84_TO_OSGB36.inverse())
}
