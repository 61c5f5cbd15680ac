//! Axum HTTP server for the tutor chat
//!
//! Routes:
//!
//! - `GET /` renders the current conversation
//! - `POST /` (form field `user_input`) runs one exchange, then redirects to `/`
//! - `POST /clear` resets the conversation and answers `204 No Content`
//!
//! Session identity travels in a cookie; a new identity is minted and set
//! whenever a request arrives without a valid one.

pub mod page;

use crate::chat::ChatService;
use crate::config::Config;
use crate::error::Result;
use crate::session::SessionId;

pub use page::PageRenderer;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// How often expired sessions are purged while serving
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Request handler for chat exchanges
    pub chat: Arc<ChatService>,
    /// Page renderer
    pub pages: Arc<PageRenderer>,
    /// Name of the session cookie
    pub cookie_name: Arc<str>,
}

impl AppState {
    /// Build state around a chat service
    ///
    /// # Errors
    ///
    /// Returns error if the page template fails to load
    pub fn new(chat: Arc<ChatService>, cookie_name: impl Into<Arc<str>>) -> Result<Self> {
        Ok(Self {
            chat,
            pages: Arc::new(PageRenderer::new()?),
            cookie_name: cookie_name.into(),
        })
    }
}

/// Infrastructure failure inside a handler, reported as `500`
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", self.0),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Session identity resolved from the request cookie
#[derive(Debug, Clone)]
pub struct SessionCookie {
    /// Resolved identity
    pub id: SessionId,
    /// Whether the identity was minted for this request
    pub is_new: bool,
}

/// Find a cookie value by name in the request headers
fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[async_trait]
impl FromRequestParts<AppState> for SessionCookie {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        match find_cookie(&parts.headers, &state.cookie_name).and_then(SessionId::parse) {
            Some(id) => Ok(Self { id, is_new: false }),
            None => Ok(Self {
                id: SessionId::generate(),
                is_new: true,
            }),
        }
    }
}

impl SessionCookie {
    /// Attach `Set-Cookie` to a response when the identity is new
    fn attach(&self, cookie_name: &str, response: impl IntoResponse) -> Result<Response> {
        let mut response = response.into_response();
        if self.is_new {
            let value = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                cookie_name, self.id
            );
            response
                .headers_mut()
                .append(header::SET_COOKIE, HeaderValue::from_str(&value)?);
        }
        Ok(response)
    }
}

/// Form body of a chat submission
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    /// The user's message
    pub user_input: String,
}

async fn index(
    State(state): State<AppState>,
    session: SessionCookie,
) -> std::result::Result<Response, AppError> {
    let conversation = state.chat.history(&session.id).await?;
    let html = state.pages.render_index(&conversation)?;
    Ok(session.attach(&state.cookie_name, Html(html))?)
}

async fn submit(
    State(state): State<AppState>,
    session: SessionCookie,
    Form(form): Form<ChatForm>,
) -> std::result::Result<Response, AppError> {
    let outcome = state.chat.submit(&session.id, &form.user_input).await?;
    tracing::debug!("Session {} submission outcome: {:?}", session.id, outcome);
    Ok(session.attach(&state.cookie_name, Redirect::to("/"))?)
}

async fn clear(
    State(state): State<AppState>,
    session: SessionCookie,
) -> std::result::Result<Response, AppError> {
    state.chat.clear(&session.id).await?;
    Ok(session.attach(&state.cookie_name, StatusCode::NO_CONTENT)?)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = tracing::info_span!("request", %method, %path);
    let started = Instant::now();

    let response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            "{} {} -> {} ({} ms)",
            method,
            path,
            response.status().as_u16(),
            started.elapsed().as_millis()
        );
    });
    response
}

/// Build the application router
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tutorchat::chat::{ChatService, ChatSettings};
/// use tutorchat::providers::FakeGateway;
/// use tutorchat::server::{router, AppState};
/// use tutorchat::session::InMemorySessionStore;
///
/// let chat = Arc::new(ChatService::new(
///     Arc::new(FakeGateway::new()),
///     Arc::new(InMemorySessionStore::new(None)),
///     ChatSettings::new("gpt-4o"),
/// ));
/// let app = router(AppState::new(chat, "tutorchat_session").unwrap());
/// # let _ = app;
/// ```
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/clear", post(clear))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Serve the chat until Ctrl-C
///
/// # Errors
///
/// Returns error if the listen address is invalid, binding fails, or the
/// server stops with an error
pub async fn serve(config: &Config, chat: Arc<ChatService>) -> Result<()> {
    let addr = config.bind_addr()?;
    let state = AppState::new(Arc::clone(&chat), config.server.cookie_name.as_str())?;

    let purger = tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = chat.purge_expired().await {
                tracing::warn!("Session purge failed: {}", e);
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Tutor chat listening on http://{}", listener.local_addr()?);

    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    purger.abort();
    result?;
    tracing::info!("Server stopped");
    Ok(())
}
