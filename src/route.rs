//! Route definitions for the link API
//!
//! Maps HTTP routes to their handlers and wires in the application state.

use axum::routing::get;
use axum::Router;

use crate::database::AppState;
use crate::handler::{create_link, delete_link, get_link, list_links, redirect_to_target};

/// Creates the axum application router.
///
/// # Route Definitions
///
/// - `GET /{code}` - Redirects to the target URL (public endpoint)
/// - `GET /api/links` - Lists all links, newest first
/// - `POST /api/links` - Creates a new short link
/// - `GET /api/links/{code}` - Fetches a single link record
/// - `DELETE /api/links/{code}` - Deletes a link
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/links", get(list_links).post(create_link))
        .route("/links/{code}", get(get_link).delete(delete_link));

    Router::new()
        // Public redirect endpoint - resolves a code and records the click
        .route("/{code}", get(redirect_to_target))
        // Mount API routes under /api
        .nest("/api", api_routes)
        // Inject the application state into all handlers
        .with_state(state)
}
