use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use bytes::Bytes;
use headers::{CacheControl, ContentType, ETag, HeaderMapExt, IfNoneMatch};
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use once_cell::sync::Lazy;

use crate::error::AppError;
use crate::ResponseTypedHeaderExt as _;

pub static INDEX_CSS: &[u8] = include_bytes!("../../../frontend/index.css");

/// Appended to the stylesheet url so it can be cached forever.
pub static INDEX_CSS_VERSION: Lazy<u64> = Lazy::new(|| {
    let mut hasher = DefaultHasher::new();
    INDEX_CSS.hash(&mut hasher);
    hasher.finish()
});

pub fn indexcss<B>(request: &Request<B>) -> Result<Response<Full<Bytes>>, AppError> {
    let if_none_match: Option<IfNoneMatch> = request.headers().typed_get();
    let etag = format!("\"{:x}\"", *INDEX_CSS_VERSION)
        .parse::<ETag>()
        .map_err(|_| AppError::InvalidETag)?;
    if if_none_match.map_or(true, |header| header.precondition_passes(&etag)) {
        Ok(Response::builder()
            .status(StatusCode::OK)
            .typed_header(ContentType::from(mime::TEXT_CSS_UTF_8))
            .typed_header(etag)
            .typed_header(
                CacheControl::new()
                    .with_immutable()
                    .with_public()
                    .with_max_age(Duration::from_secs(31_536_000)),
            )
            .body(Full::new(Bytes::from_static(INDEX_CSS)))?)
    } else {
        Ok(Response::builder()
            .status(StatusCode::NOT_MODIFIED)
            .body(Full::default())?)
    }
}
