//! Local North-East-Down displacement between two geodetic positions.
//!
//! Uses the meridian and prime-vertical radii of curvature of the WGS-84
//! ellipsoid at the first point. This is a flat-earth approximation: it is
//! accurate for baselines of a few kilometres and degrades with distance, and
//! longitude differences are not wrapped across the antimeridian.

/// WGS-84 semi-major axis, m
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS-84 first eccentricity squared
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Displacement in metres along local north, east and down
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ned {
    pub north: f64,
    pub east: f64,
    pub down: f64,
}

impl Ned {
    /// Horizontal distance
    pub fn horizontal(&self) -> f64 {
        self.north.hypot(self.east)
    }
}

/// Latitude and longitude in degrees, height above the ellipsoid in metres
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeodeticPoint {
    pub lat: f64,
    pub lon: f64,
    pub height: f64,
}

impl GeodeticPoint {
    pub const fn new(lat: f64, lon: f64, height: f64) -> Self {
        Self { lat, lon, height }
    }

    /// Displacement from `self` to `other`, see [ned]
    pub fn ned_to(&self, other: &GeodeticPoint) -> Ned {
        ned(
            self.lat,
            self.lon,
            self.height,
            other.lat,
            other.lon,
            other.height,
        )
    }
}

/// NED displacement of point 2 relative to point 1.
///
/// ```
/// let d = ubx_nav::ned(52.0, 13.0, 40.0, 52.0, 13.0, 45.0);
/// assert_eq!(d.north, 0.0);
/// assert_eq!(d.down, -5.0);
/// ```
pub fn ned(lat1: f64, lon1: f64, h1: f64, lat2: f64, lon2: f64, h2: f64) -> Ned {
    let phi1 = lat1.to_radians();
    let sin_phi = phi1.sin();
    let w2 = 1.0 - WGS84_E2 * sin_phi * sin_phi;
    let rm = WGS84_A * (1.0 - WGS84_E2) / w2.powf(1.5);
    let rn = WGS84_A / w2.sqrt();

    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    Ned {
        north: d_phi * (rm + h1),
        east: d_lambda * (rn + h1) * phi1.cos(),
        down: -(h2 - h1),
    }
}
