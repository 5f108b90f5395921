mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use common::{ALICE_ID, alice, all_grants, grants, licensed};
use serde_json::Value;
use tower::ServiceExt;
use workspace_console::{
    AppState, StaticBackend,
    auth::BYPASS_HEADER,
    config::{AppConfig, BuildMode},
    create_router,
    entitlements::FeatureName,
    handlers,
    models::RouteDecision,
    render::RenderOutcome,
};

// --- Test Harness ---

fn app_with(backend: Arc<StaticBackend>, build: BuildMode) -> Router {
    let config = AppConfig {
        build,
        ..AppConfig::default()
    };
    create_router(AppState::new(config, backend))
}

fn app() -> Router {
    let backend = StaticBackend::new()
        .with_user(alice(), all_grants())
        .with_entitlements(licensed(&[FeatureName::AuditLog]));
    app_with(Arc::new(backend), BuildMode::Development)
}

fn get(uri: &str, as_alice: bool) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if as_alice {
        builder = builder.header(BYPASS_HEADER, ALICE_ID.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// --- Page Fallback ---

#[tokio::test]
async fn test_anonymous_page_request_redirects_to_login() {
    let response = app().oneshot(get("/workspaces", false)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login?redirect=%2Fworkspaces"
    );
}

#[tokio::test]
async fn test_signed_in_page_request_renders_html() {
    let response = app().oneshot(get("/workspaces", true)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains("<title>Workspaces - Coder</title>"));
    assert!(html.contains("data-page=\"WorkspacesPage\""));
    assert!(html.contains("href=\"/audit\""));
}

#[tokio::test]
async fn test_unknown_page_is_404() {
    let response = app().oneshot(get("/unknown/path", false)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("data-page=\"NotFoundPage\""));
}

#[tokio::test]
async fn test_unreachable_backend_defers_with_retry_after() {
    let backend = Arc::new(StaticBackend::new().with_user(alice(), all_grants()));
    backend.set_unavailable(true);
    let app = app_with(backend, BuildMode::Development);

    let response = app.oneshot(get("/workspaces", true)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "1");
}

#[tokio::test]
async fn test_non_get_page_request_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/workspaces")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, HEAD");
}

#[tokio::test]
async fn test_login_redirect_never_leaves_the_site() {
    for target in [
        "%2F%09%2Fevil.example",
        "%2F%0D%0ASet-Cookie:%20x=1",
        "%2F%5Cevil.example",
        "https%3A%2F%2Fevil.example",
    ] {
        let uri = format!("/login?redirect={target}");
        let response = app().oneshot(get(&uri, true)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{target}");
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/", "{target}");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    let response = app()
        .oneshot(get("/login?redirect=%2Ftemplates%2Fdocker", true))
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/templates/docker"
    );
}

#[tokio::test]
async fn test_production_build_redirects_audit() {
    let backend = StaticBackend::new()
        .with_user(alice(), all_grants())
        .with_entitlements(licensed(&[FeatureName::AuditLog]));
    let app = app_with(Arc::new(backend), BuildMode::Production);

    let response = app.oneshot(get("/audit", true)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/workspaces");
}

#[tokio::test]
async fn test_responses_carry_a_request_id() {
    let response = app().oneshot(get("/api/console/health", false)).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

// --- Console JSON API ---

#[tokio::test]
async fn test_health() {
    let response = app().oneshot(get("/api/console/health", false)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_route_decision_for_create_workspace() {
    let response = app()
        .oneshot(get("/api/console/route?path=/templates/docker/workspace", true))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["kind"], "render");
    assert_eq!(json["page"], "CreateWorkspacePage");
    assert_eq!(json["pattern"], "/templates/:template/workspace");
    assert_eq!(json["params"]["template"], "docker");
    assert_eq!(json["framed"], false);
    assert_eq!(json["status"], 200);
}

#[tokio::test]
async fn test_route_decision_for_anonymous_viewer() {
    let response = app()
        .oneshot(get("/api/console/route?path=users", false))
        .await
        .unwrap();

    let decision: RouteDecision = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(
        decision,
        RouteDecision::Redirect {
            to: "/login?redirect=%2Fusers".to_string()
        }
    );
}

#[tokio::test]
async fn test_session_snapshot() {
    let backend = StaticBackend::new()
        .with_user(alice(), grants(&[workspace_console::permissions::READ_ALL_USERS]))
        .with_entitlements(licensed(&[FeatureName::Scim]));
    let app = app_with(Arc::new(backend), BuildMode::Development);

    let json = body_json(app.oneshot(get("/api/console/session", true)).await.unwrap()).await;

    assert_eq!(json["status"], "authenticated");
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["permissions"]["readAllUsers"], true);
    assert_eq!(json["permissions"]["viewAuditLog"], false);
    assert_eq!(json["feature_visibility"]["scim"], true);
}

#[tokio::test]
async fn test_session_snapshot_when_signed_out() {
    let json = body_json(app().oneshot(get("/api/console/session", false)).await.unwrap()).await;

    assert_eq!(json["status"], "unauthenticated");
    assert!(json["user"].is_null());
    assert_eq!(json["permissions"], serde_json::json!({}));
}

#[test]
fn test_decision_maps_every_outcome() {
    assert_eq!(handlers::decision(RenderOutcome::Deferred), RouteDecision::Deferred);
    assert_eq!(
        handlers::decision(RenderOutcome::Redirect {
            to: "/workspaces".to_string()
        }),
        RouteDecision::Redirect {
            to: "/workspaces".to_string()
        }
    );
}
