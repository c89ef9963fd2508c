use serde::{Deserialize, Serialize};

/// A person with location, role flags, and optional family/group membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "personId")]
    pub person_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elder: bool,
    #[serde(default)]
    pub servant: bool,
    #[serde(default)]
    pub pioneer: bool,
    #[serde(default)]
    pub leader: bool,
    #[serde(default)]
    pub helper: bool,
    #[serde(default = "default_true")]
    pub publisher: bool,
    #[serde(rename = "familyHead", default)]
    pub family_head: bool,
    #[serde(rename = "familyId", default)]
    pub family_id: Option<String>,
    #[serde(rename = "groupId", default)]
    pub group_id: Option<String>,
}

impl Person {
    /// Whether this person is currently unassigned
    pub fn unassigned(&self) -> bool {
        self.group_id.is_none()
    }
}

fn default_true() -> bool {
    true
}

/// A designated meeting point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(rename = "meetingId")]
    pub meeting_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "groupId", default)]
    pub group_id: Option<String>,
}

/// A family registry row: family identifier plus its member person ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    #[serde(rename = "familyId")]
    pub family_id: String,
    #[serde(rename = "memberPersonIds")]
    pub member_person_ids: Vec<String>,
}

/// An atomic cluster of unassigned people sharing a family identifier.
///
/// Built fresh on every engine run from the currently-unassigned subset of
/// each family; never persisted. Members are admitted into a group together
/// or not at all.
#[derive(Debug, Clone)]
pub struct FamilyUnit {
    pub family_id: String,
    pub members: Vec<Person>,
    pub latitude: f64,
    pub longitude: f64,
}

impl FamilyUnit {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// A committed or proposed group.
///
/// Membership is derived by querying the repository for people and meetings
/// whose group reference matches `group_id`; it is never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "groupId")]
    pub group_id: String,
    pub name: String,
    pub color: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Role quotas plus engine-wide grouping parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(rename = "minElders", default)]
    pub min_elders: u32,
    #[serde(rename = "minServants", default)]
    pub min_servants: u32,
    #[serde(rename = "minPioneers", default)]
    pub min_pioneers: u32,
    #[serde(rename = "minLeaders", default)]
    pub min_leaders: u32,
    #[serde(rename = "minHelpers", default)]
    pub min_helpers: u32,
    #[serde(rename = "minPublishers", default)]
    pub min_publishers: u32,
    #[serde(rename = "distanceThresholdKm")]
    pub distance_threshold_km: f64,
    #[serde(rename = "minGroupSize")]
    pub min_group_size: u32,
    #[serde(rename = "maxGroupSize")]
    pub max_group_size: u32,
    #[serde(rename = "keepFamiliesTogether")]
    pub keep_families_together: bool,
    #[serde(rename = "assignMeetingPoints")]
    pub assign_meeting_points: bool,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            min_elders: 0,
            min_servants: 0,
            min_pioneers: 0,
            min_leaders: 1,
            min_helpers: 1,
            min_publishers: 0,
            distance_threshold_km: 2.0,
            min_group_size: 3,
            max_group_size: 20,
            keep_families_together: true,
            assign_meeting_points: true,
        }
    }
}

impl Requirements {
    /// Apply per-run overrides on top of the stored configuration
    pub fn with_overrides(&self, overrides: &GroupingOverrides) -> Self {
        let mut resolved = self.clone();
        if let Some(v) = overrides.distance_threshold_km {
            resolved.distance_threshold_km = v;
        }
        if let Some(v) = overrides.min_group_size {
            resolved.min_group_size = v;
        }
        if let Some(v) = overrides.max_group_size {
            resolved.max_group_size = v;
        }
        if let Some(v) = overrides.keep_families_together {
            resolved.keep_families_together = v;
        }
        if let Some(v) = overrides.assign_meeting_points {
            resolved.assign_meeting_points = v;
        }
        resolved
    }
}

/// Per-run overrides of the stored grouping parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupingOverrides {
    #[serde(rename = "distanceThresholdKm", default)]
    pub distance_threshold_km: Option<f64>,
    #[serde(rename = "minGroupSize", default)]
    pub min_group_size: Option<u32>,
    #[serde(rename = "maxGroupSize", default)]
    pub max_group_size: Option<u32>,
    #[serde(rename = "keepFamiliesTogether", default)]
    pub keep_families_together: Option<bool>,
    #[serde(rename = "assignMeetingPoints", default)]
    pub assign_meeting_points: Option<bool>,
}

/// Role counts over a candidate or member set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub elders: u32,
    pub servants: u32,
    pub pioneers: u32,
    pub leaders: u32,
    pub helpers: u32,
    pub publishers: u32,
}

impl RoleCounts {
    /// Count role flags across a set of people
    pub fn tally<'a, I>(people: I) -> Self
    where
        I: IntoIterator<Item = &'a Person>,
    {
        let mut counts = Self::default();
        for person in people {
            if person.elder {
                counts.elders += 1;
            }
            if person.servant {
                counts.servants += 1;
            }
            if person.pioneer {
                counts.pioneers += 1;
            }
            if person.leader {
                counts.leaders += 1;
            }
            if person.helper {
                counts.helpers += 1;
            }
            if person.publisher {
                counts.publishers += 1;
            }
        }
        counts
    }
}

/// A created group together with its realized member set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResult {
    pub group: Group,
    pub members: Vec<Person>,
    #[serde(rename = "meetingId", default)]
    pub meeting_id: Option<String>,
}

/// Derived statistics for one created group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStats {
    #[serde(rename = "groupId")]
    pub group_id: String,
    pub name: String,
    #[serde(rename = "memberCount")]
    pub member_count: usize,
    #[serde(rename = "familyCount")]
    pub family_count: usize,
    #[serde(rename = "hasMeetingPoint")]
    pub has_meeting_point: bool,
    pub roles: RoleCounts,
}

impl GroupStats {
    /// Derive statistics from a created group's realized member set
    pub fn from_result(result: &GroupResult) -> Self {
        let mut family_ids: Vec<&str> = result
            .members
            .iter()
            .filter_map(|p| p.family_id.as_deref())
            .collect();
        family_ids.sort_unstable();
        family_ids.dedup();

        Self {
            group_id: result.group.group_id.clone(),
            name: result.group.name.clone(),
            member_count: result.members.len(),
            family_count: family_ids.len(),
            has_meeting_point: result.meeting_id.is_some(),
            roles: RoleCounts::tally(&result.members),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str) -> Person {
        Person {
            person_id: id.to_string(),
            name: format!("Person {}", id),
            latitude: 0.0,
            longitude: 0.0,
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
    fn test_default_requirements() {
        let req = Requirements::default();
        assert_eq!(req.min_leaders, 1);
        assert_eq!(req.min_helpers, 1);
        assert_eq!(req.min_elders, 0);
        assert_eq!(req.max_group_size, 20);
        assert!(req.keep_families_together);
    }

    #[test]
    fn test_overrides_merge() {
        let req = Requirements::default();
        let overrides = GroupingOverrides {
            distance_threshold_km: Some(5.0),
            max_group_size: Some(12),
            ..Default::default()
        };

        let resolved = req.with_overrides(&overrides);

        assert_eq!(resolved.distance_threshold_km, 5.0);
        assert_eq!(resolved.max_group_size, 12);
        // Untouched fields keep their stored values
        assert_eq!(resolved.min_group_size, req.min_group_size);
        assert_eq!(resolved.keep_families_together, req.keep_families_together);
    }

    #[test]
    fn test_role_tally() {
        let mut a = person("a");
        a.elder = true;
        a.leader = true;
        let mut b = person("b");
        b.helper = true;

        let people = vec![a, b];
        let counts = RoleCounts::tally(&people);
        assert_eq!(counts.elders, 1);
        assert_eq!(counts.leaders, 1);
        assert_eq!(counts.helpers, 1);
        assert_eq!(counts.publishers, 2);
    }
}
