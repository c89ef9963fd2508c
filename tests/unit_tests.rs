// Unit tests for Flock Algo

use flock_algo::core::{
    distance::{bounding_box, haversine_distance, within_bounding_box},
    extract_family_units, meets_requirements, Worklist,
};
use flock_algo::models::{Family, GroupingOverrides, Person, Requirements, RoleCounts};

fn create_person(id: &str, lat: f64, lon: f64) -> Person {
    Person {
        person_id: id.to_string(),
        name: format!("Person {}", id),
        latitude: lat,
        longitude: lon,
        elder: false,
        servant: false,
        pioneer: false,
        leader: false,
        helper: false,
        publisher: true,
        family_head: false,
        family_id: None,
        group_id: None,
    }
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(40.7128, -74.0060, 40.7128, -74.0060);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_symmetric() {
    let pairs = [
        ((40.7128, -74.0060), (34.0522, -118.2437)),
        ((51.5074, -0.1278), (48.8566, 2.3522)),
        ((-33.8688, 151.2093), (35.6762, 139.6503)),
    ];

    for ((lat1, lon1), (lat2, lon2)) in pairs {
        let forward = haversine_distance(lat1, lon1, lat2, lon2);
        let backward = haversine_distance(lat2, lon2, lat1, lon1);
        assert!((forward - backward).abs() < 1e-9);
    }
}

#[test]
fn test_haversine_distance_london_to_paris() {
    // Distance from London to Paris (approximately 344 km)
    let distance = haversine_distance(51.5074, -0.1278, 48.8566, 2.3522);
    assert!((distance - 344.0).abs() < 10.0, "Expected ~344km, got {}", distance);
}

#[test]
fn test_bounding_box_contains_threshold_circle() {
    let bbox = bounding_box(40.7128, -74.0060, 10.0);

    // Point ~5km north of center is inside both circle and box
    assert!(within_bounding_box(40.76, -74.0060, &bbox));

    // Far point is outside
    assert!(!within_bounding_box(50.0, -80.0, &bbox));
}

#[test]
fn test_validator_leader_helper_pair() {
    let requirements = Requirements {
        min_leaders: 1,
        min_helpers: 1,
        min_elders: 0,
        min_servants: 0,
        min_pioneers: 0,
        min_publishers: 0,
        ..Requirements::default()
    };

    let mut leader = create_person("leader", 0.0, 0.0);
    leader.leader = true;
    let mut helper = create_person("helper", 0.0, 0.0);
    helper.helper = true;

    let pair = vec![leader.clone(), helper];
    assert!(meets_requirements(&pair, &requirements));

    // Removing the helper-flagged candidate breaks the quota
    let alone = vec![leader];
    assert!(!meets_requirements(&alone, &requirements));
}

#[test]
fn test_validator_vacuous_on_zero_quotas() {
    let requirements = Requirements {
        min_leaders: 0,
        min_helpers: 0,
        ..Requirements::default()
    };

    let empty: Vec<Person> = vec![];
    assert!(meets_requirements(&empty, &requirements));
}

#[test]
fn test_role_counts_tally() {
    let mut a = create_person("a", 0.0, 0.0);
    a.elder = true;
    a.pioneer = true;
    let mut b = create_person("b", 0.0, 0.0);
    b.servant = true;

    let people = vec![a, b];
    let counts = RoleCounts::tally(&people);

    assert_eq!(counts.elders, 1);
    assert_eq!(counts.pioneers, 1);
    assert_eq!(counts.servants, 1);
    assert_eq!(counts.publishers, 2);
    assert_eq!(counts.leaders, 0);
}

#[test]
fn test_family_extraction_removes_members_from_pool() {
    let mut individuals = vec![
        create_person("a", 10.0, 20.0),
        create_person("b", 12.0, 22.0),
        create_person("c", 0.0, 0.0),
    ];
    let families = vec![Family {
        family_id: "fam1".to_string(),
        member_person_ids: vec!["a".to_string(), "b".to_string()],
    }];

    let units = extract_family_units(&mut individuals, &families);

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].size(), 2);
    assert!((units[0].latitude - 11.0).abs() < 1e-9);
    assert!((units[0].longitude - 21.0).abs() < 1e-9);

    let remaining: Vec<&str> = individuals.iter().map(|p| p.person_id.as_str()).collect();
    assert_eq!(remaining, vec!["c"]);
}

#[test]
fn test_overrides_only_replace_given_fields() {
    let stored = Requirements::default();
    let overrides = GroupingOverrides {
        max_group_size: Some(15),
        keep_families_together: Some(false),
        ..Default::default()
    };

    let resolved = stored.with_overrides(&overrides);

    assert_eq!(resolved.max_group_size, 15);
    assert!(!resolved.keep_families_together);
    assert_eq!(resolved.distance_threshold_km, stored.distance_threshold_km);
    assert_eq!(resolved.min_leaders, stored.min_leaders);
}

#[test]
fn test_worklist_preserves_discovery_order() {
    let mut pool = Worklist::new(vec!["a", "b", "c", "d"]);

    pool.take(2);
    let order: Vec<&str> = pool.iter().map(|(_, s)| *s).collect();
    assert_eq!(order, vec!["a", "b", "d"]);

    assert_eq!(pool.pop_front(), Some("a"));
    assert_eq!(pool.pop_front(), Some("b"));
    assert_eq!(pool.pop_front(), Some("d"));
    assert!(pool.is_empty());
}
