/// Kilometers per degree of latitude, and of longitude at the equator.
pub const KM_PER_DEGREE: f64 = 111.12;

/// Convert a ground distance to angular degrees at a given latitude.
///
/// A degree of longitude shrinks with cos(latitude); a degree of latitude
/// does not. This is the flat-earth approximation the whole dedup step is
/// built on, good enough at the few-kilometer scales it is used for.
pub fn km_to_degrees(latitude: f64, km: f64) -> (f64, f64) {
    let degrees_lat = km / KM_PER_DEGREE;
    let degrees_lon = km / (KM_PER_DEGREE * latitude.to_radians().cos());
    (degrees_lat, degrees_lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_degrees_are_equal() {
        let (lat, lon) = km_to_degrees(0.0, 111.12);

        assert!((lat - 1.0).abs() < 1e-12);
        assert!((lon - 1.0).abs() < 1e-12);
    }

    #[test]
    fn longitude_stretches_with_latitude() {
        // cos(60 deg) = 0.5, so a ground km covers twice the longitude.
        let (lat, lon) = km_to_degrees(60.0, 111.12);

        assert!((lat - 1.0).abs() < 1e-12);
        assert!((lon - 2.0).abs() < 1e-9);
    }

    #[test]
    fn southern_latitudes_behave_like_northern() {
        let (_, north) = km_to_degrees(45.0, 10.0);
        let (_, south) = km_to_degrees(-45.0, 10.0);

        assert!((north - south).abs() < 1e-12);
    }
}
