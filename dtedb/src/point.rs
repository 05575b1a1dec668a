//! Geographic points.

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    /// Latitude in decimal degrees, positive north.
    pub lat: f64,
    /// Longitude in decimal degrees, positive east.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// South-west corner `(lat, lon)` of the 1° × 1° cell containing this point.
    ///
    /// Uses `floor`, so `-121.5` belongs to cell `-122`.
    pub fn cell(&self) -> (i32, i32) {
        (self.lat.floor() as i32, self.lon.floor() as i32)
    }
}

impl From<(f64, f64)> for GeoPoint {
    /// Build from a `(lat, lon)` pair.
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_floors() {
        assert_eq!(GeoPoint::new(47.2, -121.5).cell(), (47, -122));
        assert_eq!(GeoPoint::new(-3.0, 5.0).cell(), (-3, 5));
        assert_eq!(GeoPoint::new(-0.1, 0.1).cell(), (-1, 0));
    }

    #[test]
    fn test_from_tuple() {
        let p: GeoPoint = (35.5, 138.7).into();
        assert_eq!(p.lat, 35.5);
        assert_eq!(p.lon, 138.7);
    }
}
