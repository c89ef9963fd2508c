use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::distance::{bounding_box, haversine_distance, within_bounding_box};
use crate::core::family::extract_family_units;
use crate::core::requirements::meets_requirements;
use crate::core::worklist::Worklist;
use crate::models::{
    FamilyUnit, Group, GroupResult, GroupStats, GroupingOverrides, Meeting, Person, Requirements,
};
use crate::services::{GroupRepository, RepositoryError};

/// Errors that can abort a clustering run
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid grouping configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of a full clustering run: the created groups with their realized
/// member sets, plus per-group statistics
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub created_groups: Vec<GroupResult>,
    pub statistics: Vec<GroupStats>,
}

/// Notification sink invoked as groups are committed during a run
pub trait RunObserver {
    fn on_group_created(&mut self, result: &GroupResult);
}

/// Observer that ignores every event
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn on_group_created(&mut self, _result: &GroupResult) {}
}

/// Candidates gathered around one seed, identified by their stable pool
/// indices. `count` includes the seed's own members.
struct Gathered {
    unit_indices: Vec<usize>,
    person_indices: Vec<usize>,
    count: usize,
}

/// Two-phase greedy grouping engine.
///
/// Phase A seeds candidate groups on unassigned meeting points; Phase B
/// sweeps up the remainder, seeding on family units first and loose
/// individuals after. Each phase draws from mutable pools in first-in
/// discovery order and validates every candidate set against the configured
/// role quotas and size bounds before committing it.
///
/// A candidate set that fails validation is permanently discarded from the
/// pools for the rest of the run; it is not returned for reconsideration by
/// a later seed.
pub struct Clusterer {
    rng: StdRng,
}

impl Clusterer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded constructor so group colors are reproducible in tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Run a full commit-mode clustering pass against the repository
    pub fn run<R>(
        &mut self,
        repo: &mut R,
        overrides: &GroupingOverrides,
    ) -> Result<RunOutcome, EngineError>
    where
        R: GroupRepository,
    {
        self.run_with_observer(repo, overrides, &mut NoopObserver)
    }

    /// Run a full pass, notifying `observer` for every committed group
    pub fn run_with_observer<R, O>(
        &mut self,
        repo: &mut R,
        overrides: &GroupingOverrides,
        observer: &mut O,
    ) -> Result<RunOutcome, EngineError>
    where
        R: GroupRepository,
        O: RunObserver,
    {
        let requirements = repo.requirements()?.with_overrides(overrides);
        validate_configuration(&requirements)?;

        let mut loose = repo.list_unassigned_persons()?;
        let families = repo.list_families()?;
        let units = if requirements.keep_families_together {
            extract_family_units(&mut loose, &families)
        } else {
            Vec::new()
        };
        let meetings = repo.list_unassigned_meetings()?;

        if loose.is_empty() && units.is_empty() {
            warn!("No unassigned people; nothing to group");
            return Ok(RunOutcome {
                created_groups: Vec::new(),
                statistics: Vec::new(),
            });
        }

        let mut units = Worklist::new(units);
        let mut individuals = Worklist::new(loose);
        let mut meeting_assigned = vec![false; meetings.len()];
        let mut created_groups: Vec<GroupResult> = Vec::new();

        // Phase A: meeting-seeded, in meeting enumeration order
        for (meeting_idx, meeting) in meetings.iter().enumerate() {
            if units.is_empty() && individuals.is_empty() {
                break;
            }

            let gathered = gather_candidates(
                meeting.latitude,
                meeting.longitude,
                0,
                &requirements,
                &units,
                &individuals,
            );
            let candidates = drain_gathered(&mut units, &mut individuals, &gathered);

            if !admissible(&candidates, &requirements) {
                debug!(
                    meeting = %meeting.meeting_id,
                    candidates = candidates.len(),
                    "Candidate set around meeting point rejected"
                );
                continue;
            }

            let result = self.commit_group(
                repo,
                meeting.name.clone(),
                candidates,
                Some(meeting),
                &requirements,
            )?;
            meeting_assigned[meeting_idx] = result.meeting_id.is_some();
            observer.on_group_created(&result);
            created_groups.push(result);
        }

        // Phase B: sweep the remainder, family units before individuals
        while !units.is_empty() || !individuals.is_empty() {
            let (origin_lat, origin_lon, mut candidates) = if let Some(unit) = units.pop_front() {
                (unit.latitude, unit.longitude, unit.members)
            } else if let Some(person) = individuals.pop_front() {
                (person.latitude, person.longitude, vec![person])
            } else {
                break;
            };

            let gathered = gather_candidates(
                origin_lat,
                origin_lon,
                candidates.len(),
                &requirements,
                &units,
                &individuals,
            );
            candidates.extend(drain_gathered(&mut units, &mut individuals, &gathered));

            if !admissible(&candidates, &requirements) {
                debug!(
                    candidates = candidates.len(),
                    "Candidate set around seed rejected"
                );
                continue;
            }

            let name = nearest_meeting_name(origin_lat, origin_lon, &meetings, &meeting_assigned)
                .unwrap_or_else(|| format!("Group {}", created_groups.len() + 1));

            let result = self.commit_group(repo, name, candidates, None, &requirements)?;
            observer.on_group_created(&result);
            created_groups.push(result);
        }

        let statistics: Vec<GroupStats> =
            created_groups.iter().map(GroupStats::from_result).collect();

        info!(
            groups = created_groups.len(),
            assigned = statistics.iter().map(|s| s.member_count).sum::<usize>(),
            "Clustering run complete"
        );

        Ok(RunOutcome {
            created_groups,
            statistics,
        })
    }

    /// Create the group, assign every candidate (and optionally the seeding
    /// meeting point), and build the result descriptor
    fn commit_group<R>(
        &mut self,
        repo: &mut R,
        name: String,
        mut members: Vec<Person>,
        meeting: Option<&Meeting>,
        requirements: &Requirements,
    ) -> Result<GroupResult, EngineError>
    where
        R: GroupRepository,
    {
        let color = random_group_color(&mut self.rng);
        let group_id = repo.create_group(&name, &color)?;

        for member in &mut members {
            repo.assign_person_to_group(&member.person_id, &group_id)?;
            member.group_id = Some(group_id.clone());
        }

        let meeting_id = match meeting {
            Some(meeting) if requirements.assign_meeting_points => {
                repo.assign_meeting_to_group(&meeting.meeting_id, &group_id)?;
                Some(meeting.meeting_id.clone())
            }
            _ => None,
        };

        info!(group = %name, members = members.len(), "Created group");

        Ok(GroupResult {
            group: Group {
                group_id,
                name,
                color,
                created_at: chrono::Utc::now(),
            },
            members,
            meeting_id,
        })
    }
}

impl Default for Clusterer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject configurations the engine cannot run with, before any mutation
fn validate_configuration(requirements: &Requirements) -> Result<(), EngineError> {
    if !requirements.distance_threshold_km.is_finite() || requirements.distance_threshold_km <= 0.0
    {
        return Err(EngineError::Configuration(
            "distance threshold must be a positive number of kilometers".to_string(),
        ));
    }
    if requirements.min_group_size == 0 {
        return Err(EngineError::Configuration(
            "minimum group size must be at least 1".to_string(),
        ));
    }
    if requirements.max_group_size < requirements.min_group_size {
        return Err(EngineError::Configuration(
            "maximum group size must not be below the minimum".to_string(),
        ));
    }
    Ok(())
}

/// Collect everything within the distance threshold of the origin.
///
/// Family units are scanned first and admitted whole; a unit may push the
/// running count past the maximum group size (units are never split). Loose
/// individuals are collected one at a time afterwards. Collection stops as
/// soon as the running count reaches the maximum.
fn gather_candidates(
    origin_lat: f64,
    origin_lon: f64,
    seed_count: usize,
    requirements: &Requirements,
    units: &Worklist<FamilyUnit>,
    individuals: &Worklist<Person>,
) -> Gathered {
    let max_size = requirements.max_group_size as usize;
    let threshold = requirements.distance_threshold_km;
    let bbox = bounding_box(origin_lat, origin_lon, threshold);

    let mut gathered = Gathered {
        unit_indices: Vec::new(),
        person_indices: Vec::new(),
        count: seed_count,
    };

    for (idx, unit) in units.iter() {
        if gathered.count >= max_size {
            break;
        }
        if within_bounding_box(unit.latitude, unit.longitude, &bbox)
            && haversine_distance(origin_lat, origin_lon, unit.latitude, unit.longitude)
                <= threshold
        {
            gathered.count += unit.size();
            gathered.unit_indices.push(idx);
        }
    }

    for (idx, person) in individuals.iter() {
        if gathered.count >= max_size {
            break;
        }
        if within_bounding_box(person.latitude, person.longitude, &bbox)
            && haversine_distance(origin_lat, origin_lon, person.latitude, person.longitude)
                <= threshold
        {
            gathered.count += 1;
            gathered.person_indices.push(idx);
        }
    }

    gathered
}

/// Remove the gathered entries from their pools and flatten them into a
/// candidate list, units before individuals, in discovery order
fn drain_gathered(
    units: &mut Worklist<FamilyUnit>,
    individuals: &mut Worklist<Person>,
    gathered: &Gathered,
) -> Vec<Person> {
    let mut candidates = Vec::new();
    for &idx in &gathered.unit_indices {
        if let Some(unit) = units.take(idx) {
            candidates.extend(unit.members);
        }
    }
    for &idx in &gathered.person_indices {
        if let Some(person) = individuals.take(idx) {
            candidates.push(person);
        }
    }
    candidates
}

/// Combined admission check: minimum size plus role quotas
fn admissible(candidates: &[Person], requirements: &Requirements) -> bool {
    candidates.len() >= requirements.min_group_size as usize
        && meets_requirements(candidates, requirements)
}

/// Name donor for Phase B groups: the closest meeting point that did not end
/// up assigned to a group during Phase A
fn nearest_meeting_name(
    origin_lat: f64,
    origin_lon: f64,
    meetings: &[Meeting],
    meeting_assigned: &[bool],
) -> Option<String> {
    meetings
        .iter()
        .zip(meeting_assigned)
        .filter(|(_, assigned)| !**assigned)
        .map(|(meeting, _)| {
            let distance =
                haversine_distance(origin_lat, origin_lon, meeting.latitude, meeting.longitude);
            (meeting, distance)
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(meeting, _)| meeting.name.clone())
}

fn random_group_color(rng: &mut StdRng) -> String {
    format!(
        "#{:02X}{:02X}{:02X}",
        rng.gen_range(0..=255u8),
        rng.gen_range(0..=255u8),
        rng.gen_range(0..=255u8)
    )
}
