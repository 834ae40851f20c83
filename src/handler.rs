//! HTTP request handlers for the link API
//!
//! Thin axum handlers over the store and services:
//! - Listing links (newest first, annotated with their short URL)
//! - Creating links with custom or random codes
//! - Fetching and deleting links by code
//! - Redirecting short codes to their targets
//!
//! All failure paths go through [`AppError`], which maps them to the right
//! status code and JSON body.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::database::AppState;
use crate::error::AppError;
use crate::model::{CreateLinkRequest, LinkResponse};
use crate::service;

/// `GET /api/links` — all links, newest first, each with its short URL.
pub async fn list_links(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let links = state.store.list_all()?;

    let body: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| LinkResponse::new(link, &state.base_url))
        .collect();

    Ok(Json(body))
}

/// `POST /api/links` — creates a new short link.
///
/// Responds **201 Created** with the record and its short URL, **400** on an
/// invalid URL or code shape, **409** when the code is already taken.
pub async fn create_link(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    let link = service::allocate(&state.store, payload.long_url, payload.code)?;

    tracing::info!(code = %link.code, "short link created");

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::new(link, &state.base_url)),
    ))
}

/// `GET /api/links/{code}` — fetches a single link record.
///
/// Reading never counts as a click; only the redirect route mutates the
/// counters.
pub async fn get_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    match state.store.find_by_code(&code)? {
        Some(link) => Ok(Json(link)),
        None => Err(AppError::NotFound("Short link not found".to_string())),
    }
}

/// `DELETE /api/links/{code}` — hard-deletes a link.
pub async fn delete_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store.delete(&code)? {
        return Err(AppError::NotFound("Short link not found".to_string()));
    }

    tracing::info!(code = %code, "short link deleted");

    Ok(Json(json!({
        "message": "Short link deleted successfully"
    })))
}

/// `GET /{code}` — resolves a short code and redirects to its target.
///
/// Responds **302 Found** with the target in the `Location` header. axum's
/// `Redirect` helper only offers 303/307/308, so the response is built
/// directly.
pub async fn redirect_to_target(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target = service::resolve(&state.store, &code)?;

    Ok((StatusCode::FOUND, [(header::LOCATION, target)]))
}
