use std::collections::{BTreeMap, BTreeSet};

use nominations_storage::{KeyValueStorage, StorageError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::registry::{self, Candidate, CandidateId, Role};

/// Which candidates fill which role, in drop order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments {
    roles: BTreeMap<Role, Vec<&'static Candidate>>,
}

impl Assignments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty for roles nobody was assigned to.
    #[must_use]
    pub fn get(&self, role: Role) -> &[&'static Candidate] {
        self.roles.get(&role).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn role_of(&self, id: CandidateId) -> Option<Role> {
        self.roles
            .iter()
            .find(|(_, candidates)| candidates.iter().any(|candidate| candidate.id == id))
            .map(|(role, _)| *role)
    }

    #[must_use]
    pub fn is_assigned(&self, id: CandidateId) -> bool {
        self.role_of(id).is_some()
    }

    #[must_use]
    pub fn assigned_ids(&self) -> BTreeSet<CandidateId> {
        self.roles
            .values()
            .flatten()
            .map(|candidate| candidate.id)
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.values().all(Vec::is_empty)
    }

    fn push(&mut self, role: Role, candidate: &'static Candidate) {
        self.roles.entry(role).or_default().push(candidate);
    }

    fn remove(&mut self, role: Role, id: CandidateId) -> Option<&'static Candidate> {
        let candidates = self.roles.get_mut(&role)?;
        let index = candidates.iter().position(|candidate| candidate.id == id)?;
        let removed = candidates.remove(index);
        if candidates.is_empty() {
            self.roles.remove(&role);
        }
        Some(removed)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let stored: BTreeMap<&str, Vec<StoredCandidate>> = self
            .roles
            .iter()
            .map(|(role, candidates)| {
                (
                    role.name(),
                    candidates.iter().map(|candidate| StoredCandidate::from(*candidate)).collect(),
                )
            })
            .collect();
        serde_json::to_string(&stored)
    }

    /// Rebuilds the assignments from their stored form. Anything that does not
    /// describe a registry candidate that can legally sit in its role is
    /// skipped, so the result always satisfies the store invariants.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let stored: BTreeMap<String, Vec<serde_json::Value>> = serde_json::from_str(json)?;
        let mut assignments = Self::new();
        for (role_name, records) in stored {
            let Ok(role) = role_name.parse::<Role>() else {
                warn!("ignoring stored assignments for unknown role {role_name:?}");
                continue;
            };
            for value in records {
                let record = match serde_json::from_value::<StoredCandidate>(value) {
                    Ok(record) => record,
                    Err(error) => {
                        warn!("ignoring malformed stored candidate in {role}: {error}");
                        continue;
                    }
                };
                let Some(candidate) = record.resolve() else {
                    warn!("ignoring stored candidate {record:?} in {role}");
                    continue;
                };
                if !candidate.is_eligible_for(role) {
                    warn!("ignoring stored {} in {role}, not eligible", candidate.name);
                    continue;
                }
                if let Some(other) = assignments.role_of(candidate.id) {
                    warn!("ignoring stored {} in {role}, already in {other}", candidate.name);
                    continue;
                }
                assignments.push(role, candidate);
            }
        }
        Ok(assignments)
    }
}

/// The persisted shape of an assigned candidate. Every field is optional when
/// reading; the candidate is found again by `id`, or by `name` if there is no
/// usable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CandidateId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub eligible_roles: Vec<String>,
    // older data called the category "role"
    #[serde(default, alias = "role", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl StoredCandidate {
    fn resolve(&self) -> Option<&'static Candidate> {
        self.id
            .and_then(registry::candidate)
            .or_else(|| self.name.as_deref().and_then(registry::candidate_by_name))
    }
}

impl From<&Candidate> for StoredCandidate {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: Some(candidate.id),
            name: Some(candidate.name.to_owned()),
            eligible_roles: candidate
                .eligible_roles
                .iter()
                .map(|role| role.name().to_owned())
                .collect(),
            category: Some(candidate.category.name().to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum AssignOutcome {
    Assigned,
    Ineligible,
    AlreadyAssigned(Role),
}

/// The assignments together with the storage they are kept in. Every change is
/// written through immediately.
#[derive(Debug)]
pub struct AssignmentStore<S> {
    assignments: Assignments,
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> AssignmentStore<S> {
    /// Starts empty when nothing usable is stored under `key`.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let assignments = match storage.get_item(&key) {
            Ok(Some(json)) => Assignments::from_json(&json).unwrap_or_else(|error| {
                warn!("stored assignments under {key:?} are malformed, starting empty: {error}");
                Assignments::new()
            }),
            Ok(None) => {
                debug!("no stored assignments under {key:?}");
                Assignments::new()
            }
            Err(error) => {
                warn!("failed to read stored assignments, starting empty: {error}");
                Assignments::new()
            }
        };
        Self {
            assignments,
            storage,
            key,
        }
    }

    #[must_use]
    pub const fn assignments(&self) -> &Assignments {
        &self.assignments
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn assign(&mut self, candidate: &'static Candidate, role: Role) -> AssignOutcome {
        if !candidate.is_eligible_for(role) {
            return AssignOutcome::Ineligible;
        }
        if let Some(current) = self.assignments.role_of(candidate.id) {
            return AssignOutcome::AlreadyAssigned(current);
        }
        self.assignments.push(role, candidate);
        info!("assigned {} to {role}", candidate.name);
        self.persist();
        AssignOutcome::Assigned
    }

    /// Returns whether anything was removed.
    pub fn unassign(&mut self, role: Role, id: CandidateId) -> bool {
        let Some(candidate) = self.assignments.remove(role, id) else {
            debug!("candidate {id} is not assigned to {role}");
            return false;
        };
        info!("removed {} from {role}", candidate.name);
        self.persist();
        true
    }

    pub fn save(&mut self) -> Result<(), StorageError> {
        let json = self.assignments.to_json().map_err(StorageError::Encode)?;
        self.storage.set_item(&self.key, &json)
    }

    // the in-memory state stays authoritative when the write fails
    fn persist(&mut self) {
        if let Err(error) = self.save() {
            warn!("failed to persist assignments, keeping them in memory only: {error}");
        }
    }
}
