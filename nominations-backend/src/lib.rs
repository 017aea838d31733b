#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::too_many_lines
)]

pub mod assignments;
pub mod board;
pub mod error;
pub mod interaction;
pub mod registry;
pub mod routes;
pub mod templates;

use core::convert::Infallible;
use core::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use board::Board;
use bytes::Bytes;
use error::AppError;
use futures_util::pin_mut;
use handlebars::Handlebars;
use headers::{Header, HeaderMapExt as _};
use http::{Method, Request, Response, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt as _, Full, Limited};
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo};
use nominations_config::Config;
use nominations_storage::{FileStorage, KeyValueStorage};
use routes::actions::{self, AssignmentPayload, CandidatePayload, RolePayload};
use routes::index::index;
use routes::indexcss::indexcss;
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub trait ResponseTypedHeaderExt {
    #[must_use]
    fn typed_header<H: Header>(self, header: H) -> Self;
}

impl ResponseTypedHeaderExt for http::response::Builder {
    fn typed_header<H: Header>(mut self, header: H) -> Self {
        if let Some(headers) = self.headers_mut() {
            headers.typed_insert(header);
        }
        self
    }
}

/// Shared by all connections. There is one board and requests take turns on it.
pub struct AppState<S> {
    board: Mutex<Board<S>>,
    templates: Handlebars<'static>,
}

impl<S: KeyValueStorage> AppState<S> {
    pub fn new(board: Board<S>) -> Result<Self, AppError> {
        Ok(Self {
            board: Mutex::new(board),
            templates: templates::templates()?,
        })
    }

    pub fn board(&self) -> Result<MutexGuard<'_, Board<S>>, AppError> {
        self.board.lock().map_err(|_| AppError::Poison)
    }

    #[must_use]
    pub const fn templates(&self) -> &Handlebars<'static> {
        &self.templates
    }
}

/// Upper bound for a submitted form, the largest real one is a few dozen bytes.
pub const FORM_LIMIT: usize = 16 * 1024;

async fn read_form<T, B>(request: Request<B>) -> Result<T, AppError>
where
    T: DeserializeOwned,
    B: Body,
    B::Error: Into<BoxError>,
{
    let body = Limited::new(request.into_body(), FORM_LIMIT)
        .collect()
        .await?
        .to_bytes();
    Ok(serde_urlencoded::from_bytes(&body)?)
}

async fn route<S, B>(
    request: Request<B>,
    state: &AppState<S>,
) -> Result<Response<Full<Bytes>>, AppError>
where
    S: KeyValueStorage,
    B: Body,
    B::Error: Into<BoxError>,
{
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    match path.as_str() {
        "/" if method == Method::GET => index(state),
        "/index.css" if method == Method::GET => indexcss(&request),
        "/drag-start" if method == Method::POST => {
            let payload: CandidatePayload = read_form(request).await?;
            actions::drag_start(state, &payload)
        }
        "/drag-end" if method == Method::POST => actions::drag_end(state),
        "/drop" if method == Method::POST => {
            let payload: AssignmentPayload = read_form(request).await?;
            actions::drop_candidate(state, &payload)
        }
        "/remove" if method == Method::POST => {
            let payload: AssignmentPayload = read_form(request).await?;
            actions::remove(state, &payload)
        }
        "/select-role" if method == Method::POST => {
            let payload: RolePayload = read_form(request).await?;
            actions::select_role(state, &payload)
        }
        _ => {
            debug!("no route for {method} {path}");
            Ok(Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Full::new(Bytes::from_static(b"Not Found")))?)
        }
    }
}

pub async fn handle<S, B>(
    request: Request<B>,
    state: Arc<AppState<S>>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    S: KeyValueStorage,
    B: Body,
    B::Error: Into<BoxError>,
{
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    Ok(route(request, &state).await.unwrap_or_else(|app_error| {
        error!("{method} {path} failed: {app_error}");
        app_error.into_response()
    }))
}

pub fn setup_state(config: &Config) -> Result<AppState<FileStorage>, AppError> {
    info!(
        "loading assignments from {} under {:?}",
        config.storage_path.display(),
        config.storage_key
    );
    let storage = FileStorage::new(&config.storage_path);
    AppState::new(Board::load(storage, config.storage_key.clone()))
}

#[allow(clippy::cognitive_complexity)]
pub async fn run_server(
    config: Config,
) -> Result<impl Future<Output = Result<(), AppError>>, AppError> {
    info!("starting up server...");

    let state = Arc::new(setup_state(&config)?);
    let listener = TcpListener::bind(config.listen_address).await?;

    // tell the connections to shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let shutdown_tx = Arc::new(shutdown_tx);

    // wait for the connections to finish shutdown
    let (closed_tx, closed_rx) = watch::channel(());

    info!("listening on http://{}", listener.local_addr()?);

    Ok(async move {
        #[allow(clippy::redundant_pub_crate)]
        loop {
            select! {
                accept = listener.accept() => {
                    let (socket, remote_addr): (_, SocketAddr) = match accept {
                        Ok(accepted) => accepted,
                        Err(err) => {
                            warn!("failed to accept connection: {err}");
                            continue;
                        }
                    };
                    debug!("accepted connection from {remote_addr}");

                    let state = Arc::clone(&state);
                    let shutdown_tx = Arc::clone(&shutdown_tx);
                    let closed_rx = closed_rx.clone();

                    tokio::spawn(async move {
                        let socket = TokioIo::new(socket);

                        let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                            handle(request, Arc::clone(&state))
                        });

                        let builder = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new());
                        let connection = builder.serve_connection_with_upgrades(socket, hyper_service);
                        pin_mut!(connection);

                        let connection_result = select! {
                            connection_result = connection.as_mut() => connection_result,
                            () = shutdown_tx.closed() => {
                                connection.as_mut().graceful_shutdown();
                                connection.as_mut().await
                            }
                        };
                        if let Err(err) = connection_result {
                            error!("failed to serve connection: {err:#}");
                        }

                        drop(closed_rx);
                    });
                }
                () = shutdown_signal() => {
                    warn!("shutting down");
                    drop(shutdown_rx); // initiate shutdown
                    drop(closed_rx);
                    closed_tx.closed().await;
                    break;
                }
            }
        }

        Ok(())
    })
}

#[allow(clippy::redundant_pub_crate)]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {err}");
            core::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to install signal handler: {err}");
                core::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = core::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
