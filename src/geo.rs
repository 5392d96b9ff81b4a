//! # Center Lookup
//!
//! Distance-ranked recycling center queries.
//!
//! The center set is small (hundreds of documents, loaded from one Redis hash
//! per request), so a haversine scan with a sort is enough. No spatial
//! partitioning until the dataset says otherwise.

use crate::{
    error::AppError,
    models::{GeoPoint, RecyclingCenter},
};

/// Meters, when the client sends no radius.
pub const DEFAULT_RADIUS_M: f64 = 10_000.0;

/// Response size bound for proximity queries.
pub const NEARBY_LIMIT: usize = 50;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub struct GeoIndex {
    centers: Vec<RecyclingCenter>,
}

impl GeoIndex {
    pub fn new(centers: Vec<RecyclingCenter>) -> Self {
        Self { centers }
    }

    /// Centers within `max_distance_m` of `point`, closest first, at most
    /// `limit` of them. Centers without a valid stored location never match.
    pub fn find_nearby(
        &self,
        point: &GeoPoint,
        max_distance_m: f64,
        limit: usize,
    ) -> Result<Vec<RecyclingCenter>, AppError> {
        point.validate()?;

        if !max_distance_m.is_finite() || max_distance_m < 0.0 {
            return Err(AppError::Validation(format!(
                "invalid radius {max_distance_m}"
            )));
        }

        let mut hits: Vec<(f64, &RecyclingCenter)> = self
            .centers
            .iter()
            .filter_map(|center| {
                let location = center.location.as_ref()?;
                location.validate().ok()?;

                let distance = haversine_m(point, location);
                (distance <= max_distance_m).then_some((distance, center))
            })
            .collect();

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.truncate(limit);

        Ok(hits.into_iter().map(|(_, center)| center.clone()).collect())
    }

    /// The listing mode used when no query point is given: every center,
    /// most recently added first.
    pub fn newest_first(&self) -> Vec<RecyclingCenter> {
        let mut centers = self.centers.clone();
        centers.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        centers
    }
}

fn haversine_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlat = (b.lat() - a.lat()).to_radians();
    let dlng = (b.lng() - a.lng()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;

    fn center(name: &str, location: Option<GeoPoint>, minutes_ago: i64) -> RecyclingCenter {
        RecyclingCenter {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: "1 Example St".to_string(),
            phone: None,
            accepted_materials: vec!["Plastic".to_string()],
            location,
            operating_hours: None,
            website: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    // Berlin city center. 0.01 degrees of latitude is roughly 1.1 km.
    const QUERY: GeoPoint = GeoPoint {
        coordinates: [13.4050, 52.5200],
    };

    #[test]
    fn test_sorted_by_distance_within_radius() {
        let index = GeoIndex::new(vec![
            center("far", Some(GeoPoint::new(13.4050, 52.5600)), 0),
            center("near", Some(GeoPoint::new(13.4050, 52.5210)), 0),
            center("mid", Some(GeoPoint::new(13.4050, 52.5300)), 0),
        ]);

        let found = index.find_nearby(&QUERY, DEFAULT_RADIUS_M, NEARBY_LIMIT).unwrap();

        let names: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["near", "mid", "far"]);
    }

    #[test]
    fn test_radius_bound() {
        // About 11 km north, past the 10 km default.
        let index = GeoIndex::new(vec![center("outside", Some(GeoPoint::new(13.4050, 52.6200)), 0)]);

        let found = index.find_nearby(&QUERY, DEFAULT_RADIUS_M, NEARBY_LIMIT).unwrap();

        assert!(found.is_empty());
    }

    #[test]
    fn test_center_findable_at_its_own_point() {
        let point = GeoPoint::new(77.5946, 12.9716);
        let index = GeoIndex::new(vec![center("here", Some(point), 0)]);

        let found = index.find_nearby(&point, DEFAULT_RADIUS_M, NEARBY_LIMIT).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "here");
    }

    #[test]
    fn test_empty_index_is_empty_result() {
        let index = GeoIndex::new(Vec::new());

        assert!(index.find_nearby(&QUERY, DEFAULT_RADIUS_M, NEARBY_LIMIT).unwrap().is_empty());
    }

    #[test]
    fn test_centers_without_location_excluded() {
        let index = GeoIndex::new(vec![
            center("no point", None, 0),
            center("bad point", Some(GeoPoint::new(200.0, 52.5200)), 0),
            center("good", Some(GeoPoint::new(13.4050, 52.5210)), 0),
        ]);

        let found = index.find_nearby(&QUERY, DEFAULT_RADIUS_M, NEARBY_LIMIT).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "good");
    }

    #[test]
    fn test_limit_applies_after_sort() {
        let index = GeoIndex::new(vec![
            center("far", Some(GeoPoint::new(13.4050, 52.5400)), 0),
            center("near", Some(GeoPoint::new(13.4050, 52.5210)), 0),
        ]);

        let found = index.find_nearby(&QUERY, DEFAULT_RADIUS_M, 1).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "near");
    }

    #[test]
    fn test_invalid_query_point_rejected() {
        let index = GeoIndex::new(Vec::new());

        assert!(index.find_nearby(&GeoPoint::new(13.4, 95.0), DEFAULT_RADIUS_M, NEARBY_LIMIT).is_err());
        assert!(index.find_nearby(&QUERY, f64::NAN, NEARBY_LIMIT).is_err());
    }

    #[test]
    fn test_newest_first_listing() {
        let index = GeoIndex::new(vec![
            center("old", None, 60),
            center("new", None, 0),
            center("middle", None, 30),
        ]);

        let names: Vec<String> = index.newest_first().into_iter().map(|c| c.name).collect();

        assert_eq!(names, ["new", "middle", "old"]);
    }

    #[test]
    fn test_haversine_known_distance() {
        // One degree of latitude is about 111.2 km.
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);

        let d = haversine_m(&a, &b);
        assert!((d - 111_195.0).abs() < 100.0);
    }
}
