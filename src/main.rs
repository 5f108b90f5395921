use std::{sync::Arc, time::Duration};

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workspace_console::{
    AppState, BackendState, HttpBackend, StaticBackend,
    config::{AppConfig, Env},
    create_router,
};

/// main
///
/// Loads configuration, sets up logging, picks the backend, starts the
/// entitlements refresher and serves the console.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "workspace_console=debug,tower_http=info,axum=trace".into());

    // Pretty output locally, JSON for the log aggregator in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!(
        env = ?config.env,
        build = config.build.as_str(),
        "console starting"
    );

    let backend: BackendState = match &config.backend_url {
        Some(url) => {
            tracing::info!(%url, "using platform API backend");
            Arc::new(HttpBackend::new(url, config.service_token.clone()))
        }
        None => {
            // AppConfig::load only leaves the URL empty in Env::Local.
            tracing::warn!("CODER_URL not set, using the empty in-memory backend");
            Arc::new(StaticBackend::new())
        }
    };

    let refresh_every = Duration::from_secs(config.entitlements_refresh_secs);
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(config, backend.clone());
    app_state
        .entitlements
        .spawn_refresher(backend, refresh_every);

    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind the console listener. Check CONSOLE_BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API documentation available at http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: console server stopped unexpectedly");
}
