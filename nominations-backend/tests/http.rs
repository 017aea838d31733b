use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, ETAG, IF_NONE_MATCH, LOCATION};
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt as _, Full};
use nominations_backend::board::Board;
use nominations_backend::registry::Role;
use nominations_backend::{handle, setup_state, AppState, FORM_LIMIT};
use nominations_config::Config;
use nominations_storage::{KeyValueStorage as _, MemoryStorage};

fn state() -> Arc<AppState<MemoryStorage>> {
    Arc::new(AppState::new(Board::load(MemoryStorage::new(), "assignments")).unwrap())
}

async fn post(
    state: &Arc<AppState<MemoryStorage>>,
    path: &str,
    form: &'static str,
) -> Response<Full<Bytes>> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Full::new(Bytes::from_static(form.as_bytes())))
        .unwrap();
    handle(request, Arc::clone(state)).await.unwrap()
}

async fn get_text(state: &Arc<AppState<MemoryStorage>>, path: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(path)
        .body(Full::new(Bytes::new()))
        .unwrap();
    let response = handle(request, Arc::clone(state)).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn index_lists_every_candidate_and_role() {
    let state = state();
    let (status, page) = get_text(&state, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<h1>Nominations</h1>"));
    assert!(page.contains("<h2>Leaders</h2>"));
    for name in ["Brandon", "Nathan", "Will"] {
        assert!(page.contains(&format!(">{name}</div>")), "{name} missing");
    }
    for role in Role::ALL {
        assert!(page.contains(&format!("data-role=\"{}\"", role.name())));
    }
    assert!(page.contains("class=\"candidate eboard\""));
    assert!(page.contains("class=\"placeholder\""));
}

#[tokio::test]
async fn drop_redirects_and_assigns() {
    let state = state();
    let response = post(&state, "/drag-start", "candidate=7").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");

    let (_, page) = get_text(&state, "/").await;
    assert!(page.contains("class=\"role-box darkened\" data-role=\"President\""));
    assert!(page.contains("class=\"role-box border-highlight\" data-role=\"Treasurer\""));
    assert!(page.contains("class=\"candidate eboard dragging\" draggable=\"true\" data-candidate=\"7\""));
    assert!(page.contains("class=\"candidate eboard\" draggable=\"true\" data-candidate=\"1\""));

    let response = post(&state, "/drop", "candidate=7&role=Treasurer").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    {
        let board = state.board().unwrap();
        assert_eq!(board.assignments().get(Role::Treasurer).len(), 1);
        assert_eq!(board.interaction().dragged(), None);
        assert!(board
            .store()
            .storage()
            .get_item("assignments")
            .unwrap()
            .unwrap()
            .contains("Nathan"));
    }

    let (_, page) = get_text(&state, "/").await;
    assert!(page.contains("class=\"assigned eboard\""));
    assert!(!page.contains("data-candidate=\"7\""));
    assert!(!page.contains("darkened"));
    assert!(!page.contains(" dragging\""));
}

#[tokio::test]
async fn ineligible_drop_is_ignored() {
    let state = state();
    post(&state, "/drag-start", "candidate=7").await;
    let response = post(&state, "/drop", "candidate=7&role=President").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let board = state.board().unwrap();
    assert!(board.assignments().is_empty());
    assert_eq!(board.interaction().dragged(), None);
}

#[tokio::test]
async fn select_and_remove() {
    let state = state();
    post(&state, "/drop", "candidate=14&role=Praise+Team+Leaders").await;
    post(&state, "/select-role", "role=Praise+Team+Leaders").await;
    let (_, page) = get_text(&state, "/").await;
    assert!(page.contains("role-box selected"));
    assert!(page.contains(">Kenny</div>"));
    assert!(!page.contains(">Brandon</div>"));

    post(&state, "/remove", "role=Praise+Team+Leaders&candidate=14").await;
    post(&state, "/select-role", "role=Praise+Team+Leaders").await;
    let board = state.board().unwrap();
    assert!(board.assignments().is_empty());
    assert_eq!(board.interaction().selected_role(), None);
}

#[tokio::test]
async fn unknown_names_are_ignored_but_malformed_forms_are_rejected() {
    let state = state();
    let response = post(&state, "/drop", "candidate=6&role=Treasurer").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let response = post(&state, "/select-role", "role=Secretary").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let response = post(&state, "/drag-start", "candidate=Nathan").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let board = state.board().unwrap();
    assert!(board.assignments().is_empty());
    assert_eq!(board.interaction().selected_role(), None);
}

#[tokio::test]
async fn oversized_forms_are_rejected() {
    let state = state();
    let mut form = b"role=Treasurer&padding=".to_vec();
    form.resize(FORM_LIMIT + 1, b'x');
    let request = Request::builder()
        .method(Method::POST)
        .uri("/select-role")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Full::new(Bytes::from(form)))
        .unwrap();
    let response = handle(request, Arc::clone(&state)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(state.board().unwrap().interaction().selected_role(), None);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let state = state();
    let (status, _) = get_text(&state, "/favicon.ico").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let response = post(&state, "/", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stylesheet_is_cached_by_etag() {
    let state = state();
    let request = Request::builder()
        .uri("/index.css")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let response = handle(request, Arc::clone(&state)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/css; charset=utf-8");
    let etag = response.headers()[ETAG].clone();

    let request = Request::builder()
        .uri("/index.css")
        .header(IF_NONE_MATCH, etag)
        .body(Full::new(Bytes::new()))
        .unwrap();
    let response = handle(request, state).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn file_storage_keeps_assignments_across_restarts() {
    let directory = tempfile::tempdir().unwrap();
    let config = Config {
        storage_path: directory.path().join("storage.json"),
        ..Config::default()
    };

    let state = Arc::new(setup_state(&config).unwrap());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/drop")
        .body(Full::new(Bytes::from_static(b"candidate=8&role=Small+Group+Coordinator")))
        .unwrap();
    handle(request, state).await.unwrap();

    let restarted = setup_state(&config).unwrap();
    let board = restarted.board().unwrap();
    assert_eq!(board.assignments().get(Role::SmallGroupCoordinator)[0].name, "Paul");
}
