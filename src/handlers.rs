use axum::{
    Json,
    extract::{Query, State},
    http::{Method, StatusCode, Uri, header},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    auth::Viewer,
    markup::{Markup, document},
    models::{RouteDecision, RouteQuery, SessionSnapshotResponse},
    navigation::RequestNavigator,
    render::RenderOutcome,
    store::ClientStateStore,
};

/// Seconds a client should wait before retrying a deferred page.
const RETRY_AFTER_SECS: &str = "1";

/// Builds the request's own store from the viewer and the cached entitlements.
async fn request_store(state: &AppState, viewer: Viewer) -> ClientStateStore {
    let entitlements = state.entitlements.current(&state.backend).await;
    viewer.into_store(entitlements)
}

// --- Handlers ---

/// health
///
/// Liveness probe for load balancers.
#[utoipa::path(
    get,
    path = "/api/console/health",
    responses((status = 200, description = "Console is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// render_console
///
/// The fallback for every path that is not an API route: resolves it against
/// the console route table and answers with the page, a redirect, or a
/// retry-later while the session cannot be established.
pub async fn render_console(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    viewer: Viewer,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET, HEAD")]).into_response();
    }

    let location = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();
    let store = request_store(&state, viewer).await;
    let snapshot = store.snapshot();

    let mut navigator = RequestNavigator::new(location.as_str());
    let outcome = state.console.render(&snapshot, &mut navigator);

    match outcome {
        RenderOutcome::Rendered(view) => {
            let status = StatusCode::from_u16(view.status()).unwrap_or(StatusCode::OK);
            (status, Html(document(view.title(), &view.markup))).into_response()
        }
        RenderOutcome::Redirect { to } => Redirect::to(&to).into_response(),
        RenderOutcome::Deferred => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::RETRY_AFTER, RETRY_AFTER_SECS)],
            Html(document("Loading", &Markup::empty())),
        )
            .into_response(),
    }
}

/// route_decision
///
/// Tells the caller what the console would do for `path` with their session,
/// without rendering HTML.
#[utoipa::path(
    get,
    path = "/api/console/route",
    params(RouteQuery),
    responses((status = 200, description = "Routing decision", body = RouteDecision))
)]
pub async fn route_decision(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
    viewer: Viewer,
) -> Json<RouteDecision> {
    let location = if query.path.starts_with('/') {
        query.path
    } else {
        format!("/{}", query.path)
    };

    let store = request_store(&state, viewer).await;
    let mut navigator = RequestNavigator::new(location);
    let outcome = state.console.render(&store.snapshot(), &mut navigator);

    Json(decision(outcome))
}

/// session_snapshot
///
/// The session and feature visibility the guards see for the caller.
#[utoipa::path(
    get,
    path = "/api/console/session",
    responses((status = 200, description = "Session snapshot", body = SessionSnapshotResponse))
)]
pub async fn session_snapshot(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Json<SessionSnapshotResponse> {
    let store = request_store(&state, viewer).await;
    let session = store.select_session();

    Json(SessionSnapshotResponse {
        status: session.status(),
        user: session.user().cloned(),
        permissions: store.select_permissions().as_map().clone(),
        feature_visibility: store.select_feature_visibility().as_map().clone(),
    })
}

/// decision
///
/// The wire form of a render outcome.
pub fn decision(outcome: RenderOutcome) -> RouteDecision {
    match outcome {
        RenderOutcome::Rendered(view) => RouteDecision::Render {
            page: view.page.map(|page| page.name().to_string()),
            status: view.status(),
            pattern: view.pattern,
            params: view.params,
            framed: view.framed,
        },
        RenderOutcome::Redirect { to } => RouteDecision::Redirect { to },
        RenderOutcome::Deferred => RouteDecision::Deferred,
    }
}
