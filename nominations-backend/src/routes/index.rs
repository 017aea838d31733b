use bytes::Bytes;
use headers::ContentType;
use http::{Response, StatusCode};
use http_body_util::Full;
use nominations_storage::KeyValueStorage;
use serde::Serialize;

use crate::board::BoardView;
use crate::error::AppError;
use crate::routes::indexcss::INDEX_CSS_VERSION;
use crate::{AppState, ResponseTypedHeaderExt as _};

#[derive(Serialize)]
pub struct IndexPage {
    page_title: &'static str,
    indexcss_version: String,
    board: BoardView,
}

pub fn index<S: KeyValueStorage>(state: &AppState<S>) -> Result<Response<Full<Bytes>>, AppError> {
    let board = state.board()?.view();
    let page = state.templates().render(
        "index",
        &IndexPage {
            page_title: "Nominations",
            indexcss_version: format!("{:x}", *INDEX_CSS_VERSION),
            board,
        },
    )?;
    Ok(Response::builder()
        .status(StatusCode::OK)
        .typed_header(ContentType::html())
        .body(Full::new(Bytes::from(page)))?)
}
