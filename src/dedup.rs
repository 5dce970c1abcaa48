use std::collections::HashSet;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::distance::km_to_degrees;
use crate::error::MapError;
use crate::photo::Photo;

/// A photo's coordinates tagged with its position in the input, so tree hits
/// map back to suppression order.
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    idx: usize,
    lat: f64,
    lon: f64,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lat, self.lon])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.lat - point[0];
        let dlon = self.lon - point[1];
        dlat * dlat + dlon * dlon
    }
}

/// Collapse groups of photos closer than `distance_km` to one marker each.
///
/// The threshold is a single scalar degree radius derived from the first
/// photo's latitude (the larger of the lat/long conversions), so the circle
/// is an approximation, not a geodesic. The pass is greedy and order
/// dependent on purpose: scanning in input order, a surviving photo absorbs
/// everything inside its radius, and absorbed photos never get a turn. The
/// earliest photo of a near-group is therefore the one that stays.
pub fn filter_nearby_photos(photos: &[Photo], distance_km: f64) -> Result<Vec<Photo>, MapError> {
    if photos.is_empty() {
        return Err(MapError::EmptyInput);
    }
    for photo in photos {
        let (lat, lon) = photo.coords;
        if !lat.is_finite() || !lon.is_finite() {
            return Err(MapError::InvalidCoordinate { lat, lon });
        }
    }
    if photos.len() == 1 {
        return Ok(photos.to_vec());
    }

    let points: Vec<IndexedPoint> = photos
        .iter()
        .enumerate()
        .map(|(idx, photo)| IndexedPoint {
            idx,
            lat: photo.latitude(),
            lon: photo.longitude(),
        })
        .collect();
    let tree = RTree::bulk_load(points.clone());

    let (deg_lat, deg_lon) = km_to_degrees(photos[0].latitude(), distance_km);
    let threshold = deg_lat.max(deg_lon);

    let mut suppressed: HashSet<usize> = HashSet::new();
    for point in &points {
        if suppressed.contains(&point.idx) {
            continue;
        }
        for hit in tree.locate_within_distance([point.lat, point.lon], threshold * threshold) {
            if hit.idx != point.idx {
                suppressed.insert(hit.idx);
            }
        }
    }

    Ok(photos
        .iter()
        .enumerate()
        .filter(|(idx, _)| !suppressed.contains(idx))
        .map(|(_, photo)| photo.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use geo::{Distance, Haversine, Point};

    fn photo(name: &str, lat: f64, lon: f64) -> Photo {
        let date = NaiveDateTime::parse_from_str("2023-06-01 12:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        Photo::new(name, (lat, lon), date)
    }

    #[test]
    fn near_identical_points_collapse_to_the_first() {
        let photos = vec![
            photo("a.jpg", 10.0, 20.0),
            photo("b.jpg", 10.0001, 20.0001),
        ];

        let kept = filter_nearby_photos(&photos, 10.0).unwrap();

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].path, "a.jpg");
    }

    #[test]
    fn far_apart_points_both_survive() {
        let photos = vec![photo("a.jpg", 0.0, 0.0), photo("b.jpg", 10.0, 10.0)];

        let kept = filter_nearby_photos(&photos, 10.0).unwrap();

        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn chain_absorption_is_transitive_through_the_survivor_only() {
        // a-b within threshold, b-c within threshold, a-c not. a absorbs b;
        // c was never absorbed by a surviving point and stays.
        let photos = vec![
            photo("a.jpg", 0.0, 0.0),
            photo("b.jpg", 0.06, 0.0),
            photo("c.jpg", 0.12, 0.0),
        ];

        let kept = filter_nearby_photos(&photos, 10.0).unwrap();

        let names: Vec<_> = kept.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
    }

    #[test]
    fn survivors_keep_input_order() {
        let photos = vec![
            photo("d.jpg", 40.0, -3.0),
            photo("a.jpg", 0.0, 0.0),
            photo("c.jpg", -30.0, 150.0),
        ];

        let kept = filter_nearby_photos(&photos, 10.0).unwrap();

        let names: Vec<_> = kept.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(names, vec!["d.jpg", "a.jpg", "c.jpg"]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let photos = vec![
            photo("a.jpg", 0.0, 0.0),
            photo("b.jpg", 0.01, 0.01),
            photo("c.jpg", 1.0, 1.0),
            photo("d.jpg", 1.001, 1.002),
            photo("e.jpg", -5.0, 3.0),
        ];

        let once = filter_nearby_photos(&photos, 10.0).unwrap();
        let twice = filter_nearby_photos(&once, 10.0).unwrap();

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            assert_eq!(a.path, b.path);
        }
    }

    #[test]
    fn survivors_are_farther_apart_than_the_threshold() {
        let photos = vec![
            photo("a.jpg", 0.0, 0.0),
            photo("b.jpg", 0.02, 0.02),
            photo("c.jpg", 0.5, 0.5),
            photo("d.jpg", 0.52, 0.48),
            photo("e.jpg", 2.0, 2.0),
        ];
        let distance_km = 10.0;

        let kept = filter_nearby_photos(&photos, distance_km).unwrap();

        // Equatorial input, so the degree radius matches ground distance
        // closely and Haversine works as ground truth.
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                let meters = Haversine::distance(
                    Point::new(a.longitude(), a.latitude()),
                    Point::new(b.longitude(), b.latitude()),
                );
                assert!(meters > distance_km * 1000.0 * 0.9);
            }
        }
    }

    #[test]
    fn single_photo_passes_through() {
        let photos = vec![photo("a.jpg", 10.0, 20.0)];

        let kept = filter_nearby_photos(&photos, 10.0).unwrap();

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].path, "a.jpg");
    }

    #[test]
    fn nan_coordinate_fails_fast() {
        let photos = vec![photo("a.jpg", f64::NAN, 0.0)];

        assert!(matches!(
            filter_nearby_photos(&photos, 10.0),
            Err(MapError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn empty_input_fails_fast() {
        assert!(matches!(
            filter_nearby_photos(&[], 10.0),
            Err(MapError::EmptyInput)
        ));
    }
}
