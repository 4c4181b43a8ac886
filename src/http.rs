//! HTTP transport — maps requests to service calls and errors to status
//! codes. Uses axum for routing; a thin adapter with no logic of its own.
//!
//! ## Routes
//!
//! - `GET /health` — health check.
//! - `GET /eventos?skip=&limit=` / `POST /eventos` /
//!   `PUT /eventos/:id` / `DELETE /eventos/:id` / `GET /exportar_csv`
//! - `GET|POST /contacts` / `GET|PUT|DELETE /contacts/:id` /
//!   `GET /contacts/export`
//! - `GET|POST /videos` / `GET|PUT|DELETE /videos/:id`
//! - `POST /upload` / `GET /images` / `DELETE /images/:name` /
//!   `GET /uploads/:name`
//!
//! Uploads are JSON with base64 file content; streaming large files is out
//! of scope.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::blob::BlobStore;
use crate::contacts::{ContactPatch, ContactService, NewContact};
use crate::error::ServiceError;
use crate::events::{EventPatch, EventService, NewEvent, DEFAULT_LIMIT};
use crate::videos::VideoService;

/// Shared handler state: one service per resource type, plus the image
/// blob capability.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventService>,
    pub contacts: Arc<ContactService>,
    pub videos: Arc<VideoService>,
    pub images: BlobStore,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Store(e) = &self {
            error!("store failure: {}", e);
        }
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the full application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/eventos", get(list_events).post(create_event))
        .route("/eventos/:id", axum::routing::put(update_event).delete(delete_event))
        .route("/exportar_csv", get(export_events))
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/export", get(export_contacts))
        .route(
            "/contacts/:id",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .route("/videos", get(list_videos).post(create_video))
        .route(
            "/videos/:id",
            get(fetch_video).put(update_video).delete(delete_video),
        )
        .route("/upload", axum::routing::post(upload_image))
        .route("/images", get(list_images))
        .route("/images/:name", axum::routing::delete(delete_image))
        .route("/uploads/:name", get(fetch_upload))
        .with_state(state)
}

/// Serve the application at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve(state: AppState, addr: &str) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

// --- events ---

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let events = state.events.list(query.skip, query.limit)?;
    Ok(Json(events))
}

async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<NewEvent>,
) -> Result<impl IntoResponse, ServiceError> {
    let event = state.events.create(input)?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<EventPatch>,
) -> Result<impl IntoResponse, ServiceError> {
    let event = state.events.update(id, patch)?;
    Ok(Json(event))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.events.delete(id)?;
    Ok(Json(json!({ "detail": "Evento eliminado correctamente" })))
}

async fn export_events(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let body = state.events.export()?;
    Ok(csv_attachment("eventos.csv", body))
}

// --- contacts ---

async fn list_contacts(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let contacts = state.contacts.list()?;
    Ok(Json(contacts))
}

async fn create_contact(
    State(state): State<AppState>,
    Json(input): Json<NewContact>,
) -> Result<impl IntoResponse, ServiceError> {
    let contact = state.contacts.create(input)?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let contact = state.contacts.get(&id)?;
    Ok(Json(contact))
}

async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ContactPatch>,
) -> Result<impl IntoResponse, ServiceError> {
    let contact = state.contacts.update(&id, patch)?;
    Ok(Json(contact))
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    state.contacts.delete(&id)?;
    Ok(Json(json!({ "detail": "Contact deleted" })))
}

async fn export_contacts(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let body = state.contacts.export()?;
    Ok(csv_attachment("contacts.csv", body))
}

// --- videos ---

#[derive(Deserialize)]
struct NewVideoBody {
    title: String,
    filename: String,
    /// Base64-encoded file content.
    data: String,
}

#[derive(Deserialize)]
struct UpdateVideoBody {
    title: String,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

async fn list_videos(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let videos = state.videos.list()?;
    Ok(Json(videos))
}

async fn create_video(
    State(state): State<AppState>,
    Json(body): Json<NewVideoBody>,
) -> Result<impl IntoResponse, ServiceError> {
    let bytes = decode_base64(&body.data)?;
    let video = state.videos.create(&body.title, &body.filename, &bytes)?;
    Ok((StatusCode::CREATED, Json(video)))
}

async fn fetch_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let (_video, bytes) = state.videos.fetch(id)?;
    Ok(octet_stream(bytes))
}

async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateVideoBody>,
) -> Result<impl IntoResponse, ServiceError> {
    let replacement = match (&body.filename, &body.data) {
        (Some(filename), Some(data)) => Some((filename.clone(), decode_base64(data)?)),
        (None, None) => None,
        _ => {
            return Err(ServiceError::Validation(
                "`filename` and `data` must be given together".into(),
            ))
        }
    };
    let video = state.videos.update(
        id,
        &body.title,
        replacement.as_ref().map(|(f, b)| (f.as_str(), b.as_slice())),
    )?;
    Ok(Json(video))
}

async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let video = state.videos.delete(id)?;
    Ok(Json(video))
}

// --- images ---

#[derive(Deserialize)]
struct UploadImageBody {
    filename: String,
    /// Base64-encoded file content.
    data: String,
}

async fn upload_image(
    State(state): State<AppState>,
    Json(body): Json<UploadImageBody>,
) -> Result<impl IntoResponse, ServiceError> {
    let bytes = decode_base64(&body.data)?;
    state.images.put(&body.filename, &bytes)?;
    Ok(Json(json!({
        "success": true,
        "imageUrl": format!("/uploads/{}", body.filename),
    })))
}

async fn list_images(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let images: Vec<_> = state
        .images
        .list()?
        .into_iter()
        .map(|name| json!({ "url": format!("/uploads/{}", name) }))
        .collect();
    Ok(Json(json!({ "images": images })))
}

async fn delete_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    if state.images.delete(&name)? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ServiceError::NotFound(format!("image {}", name)))
    }
}

async fn fetch_upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ServiceError> {
    let bytes = state
        .images
        .get(&name)?
        .ok_or_else(|| ServiceError::NotFound(format!("image {}", name)))?;
    Ok(octet_stream(bytes))
}

// --- response helpers ---

fn csv_attachment(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    )
        .into_response()
}

fn octet_stream(bytes: Vec<u8>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/octet-stream".to_string())],
        bytes,
    )
        .into_response()
}

fn decode_base64(data: &str) -> Result<Vec<u8>, ServiceError> {
    BASE64
        .decode(data)
        .map_err(|e| ServiceError::Validation(format!("invalid base64 content: {}", e)))
}
