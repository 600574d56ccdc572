use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    /// True when both coordinates are finite and inside the usual ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Great-circle distance using the haversine formula.
/// Input points in degrees. Output in kilometers.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    // sqrt(h) can land a hair above 1 near antipodes
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn identical_points_are_zero_apart() {
        for p in [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(12.6674373, 123.8743633),
            GeoPoint::new(90.0, 0.0),
            GeoPoint::new(-33.8688, -151.2093),
        ] {
            assert_eq!(distance_km(p, p), 0.0);
        }
    }

    #[test]
    fn symmetric() {
        let pairs = [
            (GeoPoint::new(52.52, 13.405), GeoPoint::new(48.8566, 2.3522)),
            (GeoPoint::new(-6.2088, 106.8456), GeoPoint::new(-6.9175, 107.6191)),
            (GeoPoint::new(12.6674, 123.8744), GeoPoint::new(12.665893, 123.8746352)),
        ];
        for (a, b) in pairs {
            assert!((distance_km(a, b) - distance_km(b, a)).abs() < EPS);
        }
    }

    #[test]
    fn berlin_to_paris() {
        let berlin = GeoPoint::new(52.52, 13.405);
        let paris = GeoPoint::new(48.8566, 2.3522);
        let d = distance_km(berlin, paris);
        assert!((d - 878.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn antipodes_stay_finite() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = distance_km(a, b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);

        let pole = distance_km(GeoPoint::new(90.0, 0.0), GeoPoint::new(-90.0, 0.0));
        assert!((pole - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn closer_along_bearing_never_increases() {
        let target = GeoPoint::new(12.6674373, 123.8743633);
        let mut last = f64::INFINITY;
        // walk due south toward the target
        for step in (0..=20).rev() {
            let origin = GeoPoint::new(target.lat + f64::from(step) * 0.05, target.lng);
            let d = distance_km(origin, target);
            assert!(d <= last, "step {step}: {d} > {last}");
            last = d;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn validity_ranges() {
        assert!(GeoPoint::new(90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(90.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
