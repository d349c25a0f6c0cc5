//! JSON endpoints the page uses to drive the viewer.
//!
//! The viewer sits behind one mutex. Loads take a ticket before the body is
//! read and release the lock while it streams in, so a newer drop supersedes
//! an older one still in flight.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, FailedToBufferBody};
use axum::extract::{DefaultBodyLimit, FromRequest, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use viewer::{EventViewer, FilterOption, ItemState, ViewerError, ANY};

/// Shared state of the API handlers.
#[derive(Clone)]
pub struct AppState {
    pub viewer: Arc<Mutex<EventViewer>>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(viewer: EventViewer, max_upload_bytes: usize) -> Self {
        Self {
            viewer: Arc::new(Mutex::new(viewer)),
            max_upload_bytes,
        }
    }
}

/// What the page needs to redraw after a load or filter.
#[derive(Debug, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub total: usize,
    pub shown: usize,
    pub selected: String,
    pub options: Vec<FilterOption>,
    pub options_html: String,
    pub html: String,
}

impl ViewSnapshot {
    fn capture(viewer: &EventViewer) -> Self {
        Self {
            total: viewer.total_count(),
            shown: viewer.shown_count(),
            selected: viewer.selection().value().to_string(),
            options: viewer.filter_options().to_vec(),
            options_html: viewer.options_html(),
            html: viewer.list_html(),
        }
    }
}

/// Result of toggling one item.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResult {
    pub id: String,
    pub state: ItemState,
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

/// Error response of the API.
#[derive(Debug)]
pub enum ApiError {
    Viewer(ViewerError),
    /// Body exceeded the upload limit
    TooLarge(String),
    /// Body could not be read
    Body(String),
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        match rejection {
            BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(e)) => {
                ApiError::TooLarge(e.body_text())
            }
            other => ApiError::Body(other.body_text()),
        }
    }
}

impl From<ViewerError> for ApiError {
    fn from(e: ViewerError) -> Self {
        ApiError::Viewer(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Viewer(e) => {
                let status = match &e {
                    ViewerError::Parse(_) => StatusCode::BAD_REQUEST,
                    ViewerError::StaleLoad { .. } => StatusCode::CONFLICT,
                    ViewerError::UnknownItem(_) => StatusCode::NOT_FOUND,
                };
                (status, e.to_string())
            }
            ApiError::TooLarge(message) => (StatusCode::PAYLOAD_TOO_LARGE, message),
            ApiError::Body(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Builds the router for the viewer API.
pub fn api_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);
    Router::new()
        .route(
            "/api/events",
            post(load_events).layer(upload_limit).get(filter_events),
        )
        .route("/api/items/:id/toggle", post(toggle_item))
        .with_state(state)
}

async fn load_events(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ViewSnapshot>, ApiError> {
    let ticket = state.viewer.lock().await.begin_load();

    // The body is buffered after the ticket is issued so a later drop wins.
    let bytes = Bytes::from_request(request, &state).await.map_err(|rejection| {
        warn!("Failed to read event file: {}", rejection);
        ApiError::from(rejection)
    })?;
    let raw = String::from_utf8_lossy(&bytes);

    let mut viewer = state.viewer.lock().await;
    viewer.finish_load(ticket, &raw)?;
    Ok(Json(ViewSnapshot::capture(&viewer)))
}

async fn filter_events(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<ViewSnapshot> {
    let mut viewer = state.viewer.lock().await;
    viewer.filter(query.event_type.as_deref().unwrap_or(ANY));
    Json(ViewSnapshot::capture(&viewer))
}

async fn toggle_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResult>, ApiError> {
    let mut viewer = state.viewer.lock().await;
    let item_state = viewer.toggle(&id)?;
    let html = viewer.item_html(&id).unwrap_or_default();
    debug!("Toggled {} to {}", id, item_state);

    Ok(Json(ToggleResult {
        id,
        state: item_state,
        html,
    }))
}
