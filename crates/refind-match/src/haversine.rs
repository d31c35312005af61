//! Haversine great-circle distance.

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two lat/lon points given
/// in decimal degrees.
#[inline]
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_zero_distance() {
        let d = haversine_distance_km(52.5200, 13.4050, 52.5200, 13.4050);
        assert!(d.abs() < 0.001);
    }

    #[test]
    fn test_berlin_to_paris() {
        // Expected: ~878 km
        let d = haversine_distance_km(52.5200, 13.4050, 48.8566, 2.3522);
        assert!((d - 878.0).abs() < 5.0, "Berlin-Paris: {}", d);
    }

    #[test]
    fn test_short_city_distance() {
        // Two points ~550 m apart in central Stockholm
        let d = haversine_distance_km(59.3293, 18.0686, 59.3326, 18.0649);
        assert!(d > 0.3 && d < 0.6, "Stockholm blocks: {}", d);
    }

    #[test]
    fn test_symmetry() {
        let ab = haversine_distance_km(40.7128, -74.0060, 35.6762, 139.6503);
        let ba = haversine_distance_km(35.6762, 139.6503, 40.7128, -74.0060);
        assert!((ab - ba).abs() < 1e-9);
    }
}
