pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod services;
pub mod validation;

use crate::auth::{auth_middleware, AuthConfig, AuthService};
use crate::config::AppConfig;
use crate::services::AppServices;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub services: AppServices,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Self {
        let auth = Arc::new(AuthService::new(
            AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                jwt_issuer: config.auth_issuer.clone(),
                jwt_audience: config.auth_audience.clone(),
                token_expiration: Duration::from_secs(config.jwt_expiration as u64),
            },
            db.clone(),
        ));
        Self {
            services: AppServices::new(db.clone()),
            db,
            config,
            auth,
        }
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Assembles the application router. Everything except `/health` and
/// `/auth/login` sits behind the bearer-token middleware.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/vendor", handlers::vendors::routes())
        .nest("/party", handlers::parties::routes())
        .nest("/item", handlers::items::routes())
        .nest("/inward", handlers::inwards::routes())
        .nest("/bill", handlers::outwards::routes())
        .nest("/billPayment", handlers::payments::bill_payment_routes())
        .nest("/vendorPayment", handlers::payments::vendor_payment_routes())
        .nest("/state", handlers::locations::state_routes())
        .nest("/city", handlers::locations::city_routes())
        .nest("/reports", handlers::reports::routes())
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", handlers::auth::routes())
        .merge(protected)
        .with_state(state)
}
