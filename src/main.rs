use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use garmentflow_api::config::{init_tracing, load_config};
use garmentflow_api::{build_router, db, AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(load_config().context("failed to load configuration")?);
    init_tracing(config.log_level(), config.log_json);

    info!(environment = %config.environment, "Starting garmentflow-api");

    let db = Arc::new(
        db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to the database")?,
    );

    if config.auto_migrate {
        db::run_migrations(&db)
            .await
            .context("failed to run startup migrations")?;
    }

    let state = AppState::new(db, config.clone());
    state
        .auth
        .ensure_default_admin(&config.admin_username, &config.admin_password)
        .await
        .context("failed to seed the admin account")?;

    let cors = build_cors_layer(&config);
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shutdown complete");
    Ok(())
}

fn build_cors_layer(config: &garmentflow_api::config::AppConfig) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE];

    if let Some(raw) = config.cors_allowed_origins.as_deref() {
        let origins: Vec<HeaderValue> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        if !origins.is_empty() {
            return CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(methods)
                .allow_headers(headers);
        }
    }

    if config.should_allow_permissive_cors() {
        warn!("CORS is permissive; restrict origins before exposing the service");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        // load_config rejects this combination; an empty layer is the safe
        // fallback if it is ever reached.
        CorsLayer::new()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
