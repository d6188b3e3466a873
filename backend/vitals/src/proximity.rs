//! # Proximity Ranking
//!
//! Great-circle distance from the pet's latest position to each clinic,
//! nearest first.

use crate::models::{GeoPoint, Veterinarian};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres. Coordinates are not validated.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Two decimal places, as shown next to each clinic.
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

/// The `limit` closest candidates, each annotated with its rounded distance.
///
/// Ordering uses the rounded distance and the sort is stable, so clinics at
/// the same displayed distance keep their input order.
pub fn rank(origin: GeoPoint, candidates: &[Veterinarian], limit: usize) -> Vec<Veterinarian> {
    let mut ranked: Vec<Veterinarian> = candidates
        .iter()
        .map(|vet| Veterinarian {
            distance: Some(round_km(haversine_km(origin, vet.location))),
            ..vet.clone()
        })
        .collect();

    ranked.sort_by(|a, b| distance_of(a).total_cmp(&distance_of(b)));
    ranked.truncate(limit);

    ranked
}

fn distance_of(vet: &Veterinarian) -> f64 {
    vet.distance.unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BASE_ORIGIN, veterinarians};

    fn vet(id: &str, latitude: f64, longitude: f64) -> Veterinarian {
        Veterinarian {
            id: id.to_string(),
            name: format!("Clinic {id}"),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            location: GeoPoint::new(latitude, longitude),
            distance: None,
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let point = GeoPoint::new(28.4744, 77.5030);

        assert_eq!(haversine_km(point, point), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(28.4744, 77.5030);
        let b = GeoPoint::new(-33.8688, 151.2093);

        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_at_equator() {
        let distance = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));

        assert!((distance - 111.19).abs() < 0.5, "got {distance}");
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(1.23456), 1.23);
        assert_eq!(round_km(0.005), 0.01);
        assert_eq!(round_km(0.0), 0.0);
    }

    #[test]
    fn test_empty_candidates() {
        assert!(rank(BASE_ORIGIN, &[], 3).is_empty());
    }

    #[test]
    fn test_catalog_nearest_three() {
        let vets = veterinarians();
        let nearest = rank(BASE_ORIGIN, &vets, 3);

        assert_eq!(nearest.len(), 3);
        assert!(
            nearest
                .windows(2)
                .all(|pair| pair[0].distance <= pair[1].distance)
        );
        assert!(nearest.iter().all(|vet| vet.distance.unwrap() >= 0.0));

        let ids: Vec<&str> = nearest.iter().map(|vet| vet.id.as_str()).collect();
        assert_eq!(ids, ["vet2", "vet4", "vet1"]);

        assert_eq!(rank(BASE_ORIGIN, &vets, 3), nearest);
    }

    #[test]
    fn test_limit_larger_than_candidates() {
        let vets = veterinarians();

        let all = rank(BASE_ORIGIN, &vets, 50);
        assert_eq!(all.len(), vets.len());

        // vet7 and vet9 both round to 0.84 km
        let tail: Vec<&str> = all[8..].iter().map(|vet| vet.id.as_str()).collect();
        assert_eq!(tail, ["vet7", "vet9"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let origin = GeoPoint::new(0.0, 0.0);
        let candidates = vec![
            vet("east", 0.0, 0.01),
            vet("far", 1.0, 1.0),
            vet("west", 0.0, -0.01),
            vet("north", 0.01, 0.0),
        ];

        let ids: Vec<String> = rank(origin, &candidates, 4)
            .into_iter()
            .map(|vet| vet.id)
            .collect();

        assert_eq!(ids, ["east", "west", "north", "far"]);
    }

    #[test]
    fn test_stale_distance_is_replaced() {
        let mut stale = vet("stale", 0.0, 1.0);
        stale.distance = Some(-4.0);

        let ranked = rank(GeoPoint::new(0.0, 0.0), &[stale], 1);

        assert!(ranked[0].distance.unwrap() > 111.0);
    }
}
