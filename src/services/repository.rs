use thiserror::Error;

use crate::models::{Family, Group, Meeting, Person, Requirements};

/// Errors that can occur when interacting with the entity repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Full copy of the repository state the engine can mutate.
///
/// Captured before a preview run and written back unconditionally afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositorySnapshot {
    pub persons: Vec<Person>,
    pub meetings: Vec<Meeting>,
    pub families: Vec<Family>,
    pub groups: Vec<Group>,
}

/// Storage collaborator consumed by the clustering engine.
///
/// The engine only reads entities and proposes group-reference changes; it
/// never owns the data. Implementations must preserve insertion order in the
/// listing methods, since the engine's pool ordering is derived from it.
pub trait GroupRepository {
    fn list_unassigned_persons(&self) -> Result<Vec<Person>, RepositoryError>;
    fn list_unassigned_meetings(&self) -> Result<Vec<Meeting>, RepositoryError>;
    fn list_families(&self) -> Result<Vec<Family>, RepositoryError>;
    fn requirements(&self) -> Result<Requirements, RepositoryError>;

    fn create_group(&mut self, name: &str, color: &str) -> Result<String, RepositoryError>;
    fn assign_person_to_group(&mut self, person_id: &str, group_id: &str)
        -> Result<(), RepositoryError>;
    fn assign_meeting_to_group(&mut self, meeting_id: &str, group_id: &str)
        -> Result<(), RepositoryError>;

    fn snapshot(&self) -> RepositorySnapshot;
    fn restore(&mut self, snapshot: RepositorySnapshot);
}

/// In-memory repository backing the service.
///
/// Entities live in insertion-ordered vectors; group membership is derived
/// by scanning for matching group references rather than stored on the
/// group itself.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    persons: Vec<Person>,
    meetings: Vec<Meeting>,
    families: Vec<Family>,
    groups: Vec<Group>,
    requirements: Requirements,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requirements(requirements: Requirements) -> Self {
        Self {
            requirements,
            ..Self::default()
        }
    }

    pub fn add_person(&mut self, person: Person) -> Result<(), RepositoryError> {
        if self.persons.iter().any(|p| p.person_id == person.person_id) {
            return Err(RepositoryError::Conflict(format!(
                "person {} already exists",
                person.person_id
            )));
        }
        self.persons.push(person);
        Ok(())
    }

    pub fn add_meeting(&mut self, meeting: Meeting) -> Result<(), RepositoryError> {
        if self.meetings.iter().any(|m| m.meeting_id == meeting.meeting_id) {
            return Err(RepositoryError::Conflict(format!(
                "meeting {} already exists",
                meeting.meeting_id
            )));
        }
        self.meetings.push(meeting);
        Ok(())
    }

    /// Register a family, replacing its member list if already present
    pub fn upsert_family(&mut self, family: Family) {
        if let Some(existing) = self
            .families
            .iter_mut()
            .find(|f| f.family_id == family.family_id)
        {
            existing.member_person_ids = family.member_person_ids;
        } else {
            self.families.push(family);
        }
    }

    pub fn set_requirements(&mut self, requirements: Requirements) {
        self.requirements = requirements;
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.group_id == group_id)
    }

    /// Resolve a group's current member set by group reference
    pub fn persons_in_group(&self, group_id: &str) -> Vec<Person> {
        self.persons
            .iter()
            .filter(|p| p.group_id.as_deref() == Some(group_id))
            .cloned()
            .collect()
    }
}

impl GroupRepository for InMemoryRepository {
    fn list_unassigned_persons(&self) -> Result<Vec<Person>, RepositoryError> {
        Ok(self
            .persons
            .iter()
            .filter(|p| p.unassigned())
            .cloned()
            .collect())
    }

    fn list_unassigned_meetings(&self) -> Result<Vec<Meeting>, RepositoryError> {
        Ok(self
            .meetings
            .iter()
            .filter(|m| m.group_id.is_none())
            .cloned()
            .collect())
    }

    fn list_families(&self) -> Result<Vec<Family>, RepositoryError> {
        Ok(self.families.clone())
    }

    fn requirements(&self) -> Result<Requirements, RepositoryError> {
        Ok(self.requirements.clone())
    }

    fn create_group(&mut self, name: &str, color: &str) -> Result<String, RepositoryError> {
        let group = Group {
            group_id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            color: color.to_string(),
            created_at: chrono::Utc::now(),
        };
        let group_id = group.group_id.clone();
        self.groups.push(group);
        Ok(group_id)
    }

    fn assign_person_to_group(
        &mut self,
        person_id: &str,
        group_id: &str,
    ) -> Result<(), RepositoryError> {
        if self.group(group_id).is_none() {
            return Err(RepositoryError::NotFound(format!("group {}", group_id)));
        }
        let person = self
            .persons
            .iter_mut()
            .find(|p| p.person_id == person_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("person {}", person_id)))?;
        person.group_id = Some(group_id.to_string());
        Ok(())
    }

    fn assign_meeting_to_group(
        &mut self,
        meeting_id: &str,
        group_id: &str,
    ) -> Result<(), RepositoryError> {
        if self.group(group_id).is_none() {
            return Err(RepositoryError::NotFound(format!("group {}", group_id)));
        }
        let meeting = self
            .meetings
            .iter_mut()
            .find(|m| m.meeting_id == meeting_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("meeting {}", meeting_id)))?;
        meeting.group_id = Some(group_id.to_string());
        Ok(())
    }

    fn snapshot(&self) -> RepositorySnapshot {
        RepositorySnapshot {
            persons: self.persons.clone(),
            meetings: self.meetings.clone(),
            families: self.families.clone(),
            groups: self.groups.clone(),
        }
    }

    fn restore(&mut self, snapshot: RepositorySnapshot) {
        self.persons = snapshot.persons;
        self.meetings = snapshot.meetings;
        self.families = snapshot.families;
        self.groups = snapshot.groups;
    }
}
