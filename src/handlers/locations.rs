use crate::errors::ApiError;
use crate::handlers::common::success;
use crate::services::locations::CityFilter;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateQuery {
    #[serde(alias = "stateID")]
    pub state_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CityQuery {
    #[serde(alias = "cityID")]
    pub city_id: Option<i32>,
    pub city_name: Option<String>,
    #[serde(alias = "stateID")]
    pub state_id: Option<i32>,
}

pub fn state_routes() -> Router<AppState> {
    Router::new().route("/get", get(list_states))
}

pub fn city_routes() -> Router<AppState> {
    Router::new().route("/get", get(list_cities))
}

async fn list_states(
    State(state): State<AppState>,
    Query(query): Query<StateQuery>,
) -> Result<Response, ApiError> {
    let states = state.services.locations.states(query.state_id).await?;
    Ok(success(serde_json::json!({ "states": states })))
}

async fn list_cities(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Response, ApiError> {
    let cities = state
        .services
        .locations
        .cities(CityFilter {
            city_id: query.city_id,
            city_name: query.city_name,
            state_id: query.state_id,
        })
        .await?;
    Ok(success(serde_json::json!({ "cities": cities })))
}
