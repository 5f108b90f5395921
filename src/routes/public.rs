use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that never look at the viewer.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /api/console/health
        // Answers "ok" as long as the process serves requests.
        .route("/api/console/health", get(handlers::health))
}
