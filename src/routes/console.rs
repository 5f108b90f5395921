use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Console API Router Module
///
/// JSON views of what the page fallback decides. Both resolve the caller's
/// session through the `Viewer` extractor, exactly like a page request.
pub fn console_routes() -> Router<AppState> {
    Router::new()
        // GET /api/console/route?path=/templates/docker/workspace
        // Render, redirect or defer, with the matched pattern and parameters.
        .route("/api/console/route", get(handlers::route_decision))
        // GET /api/console/session
        // Authentication status, permissions and feature visibility.
        .route("/api/console/session", get(handlers::session_snapshot))
}
