//! Reference ellipsoids and National Grid projection constants.

/// A reference ellipsoid given by its semi-axes in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis.
    pub a: f64,
    /// Semi-minor axis.
    pub b: f64,
}

impl Ellipsoid {
    /// First eccentricity squared, `1 - b²/a²`.
    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        1.0 - (self.b * self.b) / (self.a * self.a)
    }

    /// The third flattening `n = (a - b) / (a + b)`.
    #[must_use]
    pub fn n(&self) -> f64 {
        (self.a - self.b) / (self.a + self.b)
    }
}

/// Airy 1830, the ellipsoid of OSGB36.
pub const AIRY_1830: Ellipsoid = Ellipsoid {
    a: 6_377_563.396,
    b: 6_356_256.909,
};

/// WGS84 (GRS80 to within a fraction of a millimetre), the GPS ellipsoid.
pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    b: 6_356_752.314_245,
};

/// National Grid scale factor on the central meridian.
pub const F0: f64 = 0.999_601_271_7;

/// Latitude of the true origin, degrees north.
pub const LAT0_DEG: f64 = 49.0;

/// Longitude of the true origin, degrees east.
pub const LON0_DEG: f64 = -2.0;

/// Northing of the true origin, metres.
pub const N0: f64 = -100_000.0;

/// Easting of the true origin, metres.
pub const E0: f64 = 400_000.0;
