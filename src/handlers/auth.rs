use crate::errors::ApiError;
use crate::handlers::common::{success, validate_input};
use crate::AppState;
use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: String,
    pub username: String,
    pub expires_in: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let (user, issued) = state
        .auth
        .authenticate(&payload.username, &payload.password)
        .await?;
    info!(username = %user.username, "login succeeded");

    Ok(success(LoginData {
        token: issued.token,
        username: user.username,
        expires_in: issued.expires_in,
    }))
}
