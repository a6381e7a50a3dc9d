use crate::errors::ApiError;
use crate::handlers::common::{created, success, success_message, validate_input, ListQuery};
use crate::services::parties::{CreatePartyInput, PartyDto, PartyOption};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartyRequest {
    #[validate(length(min = 1, max = 100, message = "partyName is required"))]
    pub party_name: String,
    #[validate(custom = "crate::validation::validate_mobile_number")]
    pub mobile_no: String,
    #[validate(custom = "crate::validation::validate_gst_number")]
    pub gst_number: String,
    #[validate(custom = "crate::validation::validate_pan_number")]
    pub pan_number: String,
    #[validate(custom = "crate::validation::validate_aadhaar_number")]
    pub aadhar_number: String,
    #[serde(rename = "stateID", alias = "stateId")]
    pub state_id: i32,
    #[serde(rename = "cityID", alias = "cityId")]
    pub city_id: i32,
    #[validate(length(min = 1, max = 500, message = "address is required"))]
    pub address: String,
    pub document_path: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyIdQuery {
    #[serde(alias = "partyID")]
    pub party_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PartyListData {
    parties: Vec<PartyDto>,
    total_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PartyCreatedData {
    #[serde(rename = "partyID")]
    party_id: Uuid,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(create_party))
        .route("/get", get(list_parties))
        .route("/get-parties-dropdown-list", get(party_options))
        .route("/getByPartyId", get(get_party))
        .route("/update/:id", put(update_party))
        .route("/delete", delete(delete_party))
}

fn to_input(payload: PartyRequest) -> CreatePartyInput {
    CreatePartyInput {
        party_name: payload.party_name,
        mobile_no: payload.mobile_no,
        gst_number: payload.gst_number,
        pan_number: payload.pan_number,
        aadhar_number: payload.aadhar_number,
        state_id: payload.state_id,
        city_id: payload.city_id,
        address: payload.address,
        document_path: payload.document_path,
        is_active: payload.is_active,
    }
}

async fn create_party(
    State(state): State<AppState>,
    Json(payload): Json<PartyRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let id = state.services.parties.create_party(to_input(payload)).await?;
    Ok(created(PartyCreatedData { party_id: id }))
}

async fn list_parties(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let (parties, total_count) = state.services.parties.list_parties(&query).await?;
    Ok(success(PartyListData {
        parties,
        total_count,
    }))
}

async fn party_options(State(state): State<AppState>) -> Result<Response, ApiError> {
    let parties: Vec<PartyOption> = state.services.parties.party_options().await?;
    Ok(success(serde_json::json!({ "parties": parties })))
}

async fn get_party(
    State(state): State<AppState>,
    Query(query): Query<PartyIdQuery>,
) -> Result<Response, ApiError> {
    let details = state.services.parties.party_details(query.party_id).await?;
    Ok(success(details))
}

async fn update_party(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartyRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .parties
        .update_party(id, to_input(payload))
        .await?;
    Ok(success_message("Party updated"))
}

async fn delete_party(
    State(state): State<AppState>,
    Query(query): Query<PartyIdQuery>,
) -> Result<Response, ApiError> {
    state.services.parties.delete_party(query.party_id).await?;
    Ok(success_message("Party deleted"))
}
