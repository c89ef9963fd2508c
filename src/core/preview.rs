use tracing::debug;

use crate::core::engine::{Clusterer, RunOutcome};
use crate::models::{GroupResult, GroupStats, GroupingOverrides};
use crate::services::GroupRepository;

/// Outcome of a preview run. On success the created groups and statistics
/// describe what a commit would have produced, even though the repository
/// has already been rolled back.
#[derive(Debug, Clone)]
pub struct PreviewOutcome {
    pub success: bool,
    pub created_groups: Vec<GroupResult>,
    pub statistics: Vec<GroupStats>,
    pub error: Option<String>,
}

impl PreviewOutcome {
    fn succeeded(outcome: RunOutcome) -> Self {
        Self {
            success: true,
            created_groups: outcome.created_groups,
            statistics: outcome.statistics,
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            success: false,
            created_groups: Vec::new(),
            statistics: Vec::new(),
            error: Some(message),
        }
    }
}

/// Run the engine in preview mode: snapshot the repository, run a normal
/// commit-producing pass against it, then restore the snapshot regardless of
/// how the run ended. Failures are reported in the outcome, never as a
/// partially-mutated repository.
pub fn run_preview<R>(
    clusterer: &mut Clusterer,
    repo: &mut R,
    overrides: &GroupingOverrides,
) -> PreviewOutcome
where
    R: GroupRepository,
{
    let snapshot = repo.snapshot();
    let result = clusterer.run(repo, overrides);
    repo.restore(snapshot);
    debug!("Preview snapshot restored");

    match result {
        Ok(outcome) => PreviewOutcome::succeeded(outcome),
        Err(e) => PreviewOutcome::failed(e.to_string()),
    }
}
