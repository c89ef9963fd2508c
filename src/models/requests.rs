use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::GroupingOverrides;

/// Request to run or preview an automatic grouping
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RunGroupingRequest {
    #[validate(range(min = 0.001, message = "distance threshold must be positive"))]
    #[serde(alias = "distance_threshold_km", rename = "distanceThresholdKm", default)]
    pub distance_threshold_km: Option<f64>,
    #[validate(range(min = 1))]
    #[serde(alias = "min_group_size", rename = "minGroupSize", default)]
    pub min_group_size: Option<u32>,
    #[validate(range(min = 1))]
    #[serde(alias = "max_group_size", rename = "maxGroupSize", default)]
    pub max_group_size: Option<u32>,
    #[serde(alias = "keep_families_together", rename = "keepFamiliesTogether", default)]
    pub keep_families_together: Option<bool>,
    #[serde(alias = "assign_meeting_points", rename = "assignMeetingPoints", default)]
    pub assign_meeting_points: Option<bool>,
}

impl RunGroupingRequest {
    pub fn overrides(&self) -> GroupingOverrides {
        GroupingOverrides {
            distance_threshold_km: self.distance_threshold_km,
            min_group_size: self.min_group_size,
            max_group_size: self.max_group_size,
            keep_families_together: self.keep_families_together,
            assign_meeting_points: self.assign_meeting_points,
        }
    }
}

/// Request to register a person
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddPersonRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "person_id", rename = "personId")]
    pub person_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
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
    #[serde(default = "default_publisher")]
    pub publisher: bool,
    #[serde(alias = "family_head", rename = "familyHead", default)]
    pub family_head: bool,
    #[serde(alias = "family_id", rename = "familyId", default)]
    pub family_id: Option<String>,
}

fn default_publisher() -> bool {
    true
}

/// Request to register a meeting point
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddMeetingRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "meeting_id", rename = "meetingId")]
    pub meeting_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// Request to register or replace a family's member list
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddFamilyRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "family_id", rename = "familyId")]
    pub family_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "member_person_ids", rename = "memberPersonIds")]
    pub member_person_ids: Vec<String>,
}
