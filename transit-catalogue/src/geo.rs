//! Geographic coordinates and great-circle distance.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    /// Latitude, degrees north.
    pub lat: f64,
    /// Longitude, degrees east.
    pub lng: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance between two coordinates, in meters.
///
/// Uses the spherical law of cosines, which is accurate to well under a
/// meter at city scale. The cosine argument is clamped so that rounding
/// on nearly-identical points cannot escape `acos`'s domain.
pub fn distance_between(from: Coordinates, to: Coordinates) -> f64 {
    if from == to {
        return 0.0;
    }

    let dr = std::f64::consts::PI / 180.0;
    let cos_arc = (from.lat * dr).sin() * (to.lat * dr).sin()
        + (from.lat * dr).cos() * (to.lat * dr).cos() * ((from.lng - to.lng).abs() * dr).cos();

    cos_arc.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_M
}
