use nominations_storage::KeyValueStorage;
use serde::Serialize;
use tracing::debug;

use crate::assignments::{AssignOutcome, AssignmentStore, Assignments};
use crate::interaction::{accepts_drop, drop_zone_appearance, visible_candidates, InteractionState};
use crate::registry::{Candidate, CandidateId, Role, CANDIDATES};

/// Everything the page needs, owned in one place. The presentation calls the
/// `on_*` methods and renders [`Board::view`].
#[derive(Debug)]
pub struct Board<S> {
    store: AssignmentStore<S>,
    interaction: InteractionState,
}

impl<S: KeyValueStorage> Board<S> {
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        Self {
            store: AssignmentStore::load(storage, key),
            interaction: InteractionState::new(),
        }
    }

    #[must_use]
    pub const fn assignments(&self) -> &Assignments {
        self.store.assignments()
    }

    #[must_use]
    pub const fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    #[must_use]
    pub const fn store(&self) -> &AssignmentStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AssignmentStore<S> {
        &mut self.store
    }

    pub fn on_drag_start(&mut self, candidate: &'static Candidate) {
        self.interaction.begin_drag(candidate, self.store.assignments());
    }

    pub fn on_drag_end(&mut self) {
        self.interaction.end_drag();
    }

    /// A drop always ends the drag, whether or not it was accepted.
    pub fn on_drop(&mut self, candidate: &'static Candidate, role: Role) -> AssignOutcome {
        self.interaction.end_drag();
        if !accepts_drop(candidate, role) {
            debug!("rejected dropping {} on {role}", candidate.name);
            return AssignOutcome::Ineligible;
        }
        self.store.assign(candidate, role)
    }

    pub fn on_remove_candidate(&mut self, role: Role, id: CandidateId) -> bool {
        self.store.unassign(role, id)
    }

    pub fn on_role_click(&mut self, role: Role) {
        self.interaction.toggle_role_selection(role);
    }

    #[must_use]
    pub fn visible_candidates(&self) -> Vec<&'static Candidate> {
        visible_candidates(
            &CANDIDATES,
            self.store.assignments(),
            self.interaction.selected_role(),
        )
    }

    #[must_use]
    pub fn view(&self) -> BoardView {
        let assignments = self.store.assignments();
        let dragged = self.interaction.dragged();
        BoardView {
            candidates: self
                .visible_candidates()
                .into_iter()
                .map(|candidate| {
                    let is_dragged = dragged.is_some_and(|subject| subject.id == candidate.id);
                    CandidateTile::new(candidate, true, is_dragged)
                })
                .collect(),
            roles: Role::ALL
                .into_iter()
                .map(|role| {
                    let appearance = drop_zone_appearance(role, dragged);
                    RoleBox {
                        name: role.name(),
                        assigned: assignments
                            .get(role)
                            .iter()
                            .map(|candidate| CandidateTile::new(candidate, false, false))
                            .collect(),
                        darkened: appearance.darkened,
                        highlighted: appearance.highlighted,
                        selected: self.interaction.selected_role() == Some(role),
                    }
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub candidates: Vec<CandidateTile>,
    pub roles: Vec<RoleBox>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateTile {
    pub id: CandidateId,
    pub name: &'static str,
    pub css_class: &'static str,
    pub draggable: bool,
    /// The tile currently being dragged, rendered dimmed.
    pub dragging: bool,
}

impl CandidateTile {
    fn new(candidate: &Candidate, draggable: bool, dragging: bool) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            css_class: candidate.category.css_class(),
            draggable,
            dragging,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleBox {
    pub name: &'static str,
    pub assigned: Vec<CandidateTile>,
    pub darkened: bool,
    pub highlighted: bool,
    pub selected: bool,
}
