use serde::{Deserialize, Serialize};

use crate::models::domain::{GroupResult, GroupStats, RoleCounts};

/// Response for a committed grouping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunGroupingResponse {
    #[serde(rename = "createdGroups")]
    pub created_groups: Vec<GroupResult>,
    pub statistics: Vec<GroupStats>,
}

/// Response for a preview run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewGroupingResponse {
    pub success: bool,
    #[serde(rename = "createdGroups")]
    pub created_groups: Vec<GroupResult>,
    pub statistics: Vec<GroupStats>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response for re-validating an existing group against the quotas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckGroupResponse {
    #[serde(rename = "groupId")]
    pub group_id: String,
    pub satisfied: bool,
    #[serde(rename = "memberCount")]
    pub member_count: usize,
    pub roles: RoleCounts,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
