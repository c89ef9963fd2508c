// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Family, FamilyUnit, Group, GroupResult, GroupStats, GroupingOverrides, Meeting, Person,
    Requirements, RoleCounts,
};
pub use requests::{AddFamilyRequest, AddMeetingRequest, AddPersonRequest, RunGroupingRequest};
pub use responses::{
    CheckGroupResponse, ErrorResponse, HealthResponse, PreviewGroupingResponse,
    RunGroupingResponse,
};
