//! Drag and selection state plus everything derived from it for rendering.

use tracing::debug;

use crate::assignments::Assignments;
use crate::registry::{Candidate, Role};

/// Lives for one session and is never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionState {
    dragged: Option<&'static Candidate>,
    selected_role: Option<Role>,
}

impl InteractionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn dragged(&self) -> Option<&'static Candidate> {
        self.dragged
    }

    #[must_use]
    pub const fn selected_role(&self) -> Option<Role> {
        self.selected_role
    }

    /// Assigned candidates are not draggable, so starting to drag one is ignored.
    pub fn begin_drag(&mut self, candidate: &'static Candidate, assignments: &Assignments) {
        if let Some(role) = assignments.role_of(candidate.id) {
            debug!("{} is already assigned to {role}, not dragging", candidate.name);
            return;
        }
        self.dragged = Some(candidate);
    }

    pub fn end_drag(&mut self) {
        self.dragged = None;
    }

    pub fn toggle_role_selection(&mut self, role: Role) {
        self.selected_role = if self.selected_role == Some(role) {
            None
        } else {
            Some(role)
        };
    }
}

/// Unassigned candidates, narrowed to the selected role if there is one, in
/// registry order.
pub fn visible_candidates<'a>(
    candidates: &'a [Candidate],
    assignments: &Assignments,
    selected_role: Option<Role>,
) -> Vec<&'a Candidate> {
    let assigned = assignments.assigned_ids();
    candidates
        .iter()
        .filter(|candidate| !assigned.contains(&candidate.id))
        .filter(|candidate| selected_role.map_or(true, |role| candidate.is_eligible_for(role)))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropZoneAppearance {
    /// A drag is running and the dragged candidate can't go here.
    pub darkened: bool,
    /// A drag is running and the dragged candidate can go here.
    pub highlighted: bool,
}

#[must_use]
pub fn drop_zone_appearance(role: Role, dragged: Option<&Candidate>) -> DropZoneAppearance {
    dragged.map_or_else(DropZoneAppearance::default, |candidate| {
        let eligible = candidate.is_eligible_for(role);
        DropZoneAppearance {
            darkened: !eligible,
            highlighted: eligible,
        }
    })
}

/// The drop gate. Independent of how the drop zone is rendered.
#[must_use]
pub fn accepts_drop(candidate: &Candidate, role: Role) -> bool {
    candidate.is_eligible_for(role)
}
