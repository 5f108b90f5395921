use std::sync::Arc;

use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Routing core: route tree, guards, client state, rendering.
pub mod console;
pub mod entitlements;
pub mod frame;
pub mod guard;
pub mod markup;
pub mod navigation;
pub mod page;
pub mod permissions;
pub mod render;
pub mod route;
pub mod session;
pub mod store;

// HTTP host: configuration, backend contract, viewer extraction, handlers.
pub mod auth;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

// HTTP routing (console JSON API and probes).
pub mod routes;
use routes::{console as console_api, public};

// --- Public Re-exports ---

pub use backend::{BackendState, ConsoleBackend, HttpBackend, StaticBackend};
pub use cache::EntitlementsCache;
pub use config::AppConfig;
pub use console::{Console, ConsoleApp};

/// ApiDoc
///
/// OpenAPI document for the console's JSON endpoints, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::route_decision, handlers::session_snapshot),
    components(
        schemas(
            models::RouteDecision, models::SessionSnapshotResponse, models::User,
            models::UserStatus, models::Role, session::AuthStatus,
        )
    ),
    tags(
        (name = "workspace-console", description = "Console routing API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything a request needs, shared across all requests. Nothing in it is
/// mutated by request handling except the entitlements cache, which only the
/// background refresher writes.
#[derive(Clone)]
pub struct AppState {
    /// The route table and page implementations.
    pub console: Arc<Console>,
    /// The platform API.
    pub backend: BackendState,
    /// Process-wide entitlements, seeded into every request's store.
    pub entitlements: EntitlementsCache,
    pub config: AppConfig,
}

impl AppState {
    /// Assembles the state with the console built for the configured build mode.
    pub fn new(config: AppConfig, backend: BackendState) -> Self {
        Self {
            console: Arc::new(Console::standard(config.build)),
            backend,
            entitlements: EntitlementsCache::new(),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for BackendState {
    fn from_ref(app_state: &AppState) -> BackendState {
        app_state.backend.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the HTTP surface: probes, the console JSON API, Swagger UI, and
/// the page fallback, wrapped in the request-id and tracing layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(console_api::console_routes())
        // Every other path is a console page; the route guards run inside the handler.
        .fallback(handlers::render_console)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, carrying the `x-request-id` so every log line of the
/// request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
