//! The page's callbacks. Every action answers with a redirect back to the board;
//! callbacks naming an unknown candidate or role are ignored.

use bytes::Bytes;
use http::header::LOCATION;
use http::{Response, StatusCode};
use http_body_util::Full;
use nominations_storage::KeyValueStorage;
use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;
use crate::registry::{self, Candidate, CandidateId, Role};
use crate::AppState;

#[derive(Deserialize, Debug)]
pub struct CandidatePayload {
    candidate: CandidateId,
}

#[derive(Deserialize, Debug)]
pub struct RolePayload {
    role: String,
}

#[derive(Deserialize, Debug)]
pub struct AssignmentPayload {
    candidate: CandidateId,
    role: String,
}

fn see_board() -> Result<Response<Full<Bytes>>, AppError> {
    Ok(Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(LOCATION, "/")
        .body(Full::default())?)
}

fn lookup_candidate(id: CandidateId) -> Option<&'static Candidate> {
    let candidate = registry::candidate(id);
    if candidate.is_none() {
        debug!("ignoring unknown candidate {id}");
    }
    candidate
}

fn lookup_role(name: &str) -> Option<Role> {
    name.parse::<Role>()
        .map_err(|error| debug!("ignoring {error}"))
        .ok()
}

pub fn drag_start<S: KeyValueStorage>(
    state: &AppState<S>,
    payload: &CandidatePayload,
) -> Result<Response<Full<Bytes>>, AppError> {
    if let Some(candidate) = lookup_candidate(payload.candidate) {
        state.board()?.on_drag_start(candidate);
    }
    see_board()
}

pub fn drag_end<S: KeyValueStorage>(state: &AppState<S>) -> Result<Response<Full<Bytes>>, AppError> {
    state.board()?.on_drag_end();
    see_board()
}

pub fn drop_candidate<S: KeyValueStorage>(
    state: &AppState<S>,
    payload: &AssignmentPayload,
) -> Result<Response<Full<Bytes>>, AppError> {
    match (lookup_candidate(payload.candidate), lookup_role(&payload.role)) {
        (Some(candidate), Some(role)) => {
            let outcome = state.board()?.on_drop(candidate, role);
            debug!("dropping {} on {role}: {outcome:?}", candidate.name);
        }
        // the gesture is over either way
        _ => state.board()?.on_drag_end(),
    }
    see_board()
}

pub fn remove<S: KeyValueStorage>(
    state: &AppState<S>,
    payload: &AssignmentPayload,
) -> Result<Response<Full<Bytes>>, AppError> {
    if let Some(role) = lookup_role(&payload.role) {
        state.board()?.on_remove_candidate(role, payload.candidate);
    }
    see_board()
}

pub fn select_role<S: KeyValueStorage>(
    state: &AppState<S>,
    payload: &RolePayload,
) -> Result<Response<Full<Bytes>>, AppError> {
    if let Some(role) = lookup_role(&payload.role) {
        state.board()?.on_role_click(role);
    }
    see_board()
}
