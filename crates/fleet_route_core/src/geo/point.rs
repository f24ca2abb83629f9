use std::fmt;

pub(crate) const EARTH_RADIUS_KM: f64 = 6_371.0;
const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// A WGS84 position in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance in kilometres.
    pub fn distance_km(self, rhs: &Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), rhs.lat.to_radians());
        let dlat = (rhs.lat - self.lat).to_radians();
        let dlon = (rhs.lon - self.lon).to_radians();
        let s1 = (dlat / 2.0).sin();
        let s2 = (dlon / 2.0).sin();
        let h = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;
        2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-NINETY..=NINETY).contains(&self.lat)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{},{}", b1.format(self.lat), b2.format(self.lon))
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;

    #[test]
    fn valid_bounds_are_accepted() {
        assert!(GeoPoint::new(-90.0, -180.0).is_valid());
        assert!(GeoPoint::new(90.0, 180.0).is_valid());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn distance_is_symmetric_and_zero_for_same_point() {
        let bogota = GeoPoint::new(4.7110, -74.0721);
        let medellin = GeoPoint::new(6.2442, -75.5812);

        let dab = bogota.distance_km(&medellin);
        let dba = medellin.distance_km(&bogota);

        assert!((dab - dba).abs() < 1e-9);
        assert!(bogota.distance_km(&bogota).abs() < 1e-12);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = GeoPoint::new(0.0, 0.0).distance_km(&GeoPoint::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn display_formats_as_lat_lon() {
        assert_eq!(GeoPoint::new(1.5, -2.25).to_string(), "1.5,-2.25");
    }
}
