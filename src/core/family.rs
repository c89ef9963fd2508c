use crate::models::{Family, FamilyUnit, Person};

/// Group the unassigned pool into atomic family units.
///
/// One unit is produced per family with at least one currently-unassigned
/// member; the unit contains only that unassigned subset, in registry order,
/// with a centroid at the mean of the included coordinates. Included people
/// are removed from `individuals` so nobody is counted both as a unit member
/// and as a loose individual. No role filtering happens here.
pub fn extract_family_units(
    individuals: &mut Vec<Person>,
    families: &[Family],
) -> Vec<FamilyUnit> {
    let mut units = Vec::new();

    for family in families {
        let mut members = Vec::new();
        for member_id in &family.member_person_ids {
            if let Some(pos) = individuals.iter().position(|p| &p.person_id == member_id) {
                members.push(individuals.remove(pos));
            }
        }

        if members.is_empty() {
            continue;
        }

        let count = members.len() as f64;
        let latitude = members.iter().map(|p| p.latitude).sum::<f64>() / count;
        let longitude = members.iter().map(|p| p.longitude).sum::<f64>() / count;

        units.push(FamilyUnit {
            family_id: family.family_id.clone(),
            members,
            latitude,
            longitude,
        });
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, lat: f64, lon: f64, family_id: Option<&str>) -> Person {
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
            family_id: family_id.map(|f| f.to_string()),
            group_id: None,
        }
    }

    fn family(id: &str, members: &[&str]) -> Family {
        Family {
            family_id: id.to_string(),
            member_person_ids: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_extracts_unassigned_members_only() {
        let mut individuals = vec![
            person("a", 10.0, 20.0, Some("fam1")),
            person("b", 12.0, 22.0, Some("fam1")),
            person("c", 0.0, 0.0, None),
        ];
        // "d" is in the registry but not in the unassigned pool
        let families = vec![family("fam1", &["a", "b", "d"])];

        let units = extract_family_units(&mut individuals, &families);

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].family_id, "fam1");
        assert_eq!(units[0].size(), 2);

        // Unit members left the individuals pool; unrelated person stays
        assert_eq!(individuals.len(), 1);
        assert_eq!(individuals[0].person_id, "c");
    }

    #[test]
    fn test_centroid_is_member_mean() {
        let mut individuals = vec![
            person("a", 10.0, 20.0, Some("fam1")),
            person("b", 12.0, 22.0, Some("fam1")),
        ];
        let families = vec![family("fam1", &["a", "b"])];

        let units = extract_family_units(&mut individuals, &families);

        assert!((units[0].latitude - 11.0).abs() < 1e-9);
        assert!((units[0].longitude - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_family_with_no_unassigned_members_is_skipped() {
        let mut individuals = vec![person("x", 0.0, 0.0, None)];
        let families = vec![family("fam1", &["a", "b"])];

        let units = extract_family_units(&mut individuals, &families);

        assert!(units.is_empty());
        assert_eq!(individuals.len(), 1);
    }

    #[test]
    fn test_members_keep_registry_order() {
        let mut individuals = vec![
            person("b", 0.0, 0.0, Some("fam1")),
            person("a", 0.0, 0.0, Some("fam1")),
        ];
        let families = vec![family("fam1", &["a", "b"])];

        let units = extract_family_units(&mut individuals, &families);

        let ids: Vec<&str> = units[0].members.iter().map(|p| p.person_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
