use crate::errors::ApiError;
use crate::handlers::common::{
    created, parse_date, success, success_message, validate_input, ListQuery,
};
use crate::handlers::inwards::LineItemRequest;
use crate::services::outwards::{BillDto, CreateBillInput};
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
pub struct BillRequest {
    #[serde(rename = "partyID", alias = "partyId")]
    pub party_id: Uuid,
    #[validate(length(min = 1, max = 50, message = "billNo is required"))]
    pub bill_no: String,
    #[serde(rename = "gstTypeID", alias = "gstTypeId")]
    pub gst_type_id: i32,
    pub bill_date: String,
    #[serde(default)]
    pub is_paid: bool,
    #[validate(length(min = 1, message = "items must not be empty"))]
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBillQuery {
    #[serde(rename = "billID", alias = "billId")]
    pub bill_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenBillsQuery {
    #[serde(alias = "partyID")]
    pub party_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BillListData {
    bills: Vec<BillDto>,
    total_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BillCreatedData {
    #[serde(rename = "billID")]
    bill_id: Uuid,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(create_bill))
        .route("/get", get(list_bills))
        .route("/get-open-bills", get(open_bills))
        .route("/update/:id", put(update_bill))
        .route("/delete", delete(delete_bill))
}

fn to_input(payload: BillRequest) -> Result<CreateBillInput, ApiError> {
    let bill_date = parse_date(&payload.bill_date)?;
    Ok(CreateBillInput {
        party_id: payload.party_id,
        bill_no: payload.bill_no,
        gst_type_id: payload.gst_type_id,
        bill_date,
        is_paid: payload.is_paid,
        items: payload
            .items
            .into_iter()
            .map(LineItemRequest::into_input)
            .collect(),
    })
}

async fn create_bill(
    State(state): State<AppState>,
    Json(payload): Json<BillRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    for line in &payload.items {
        validate_input(line)?;
    }
    let id = state.services.outwards.create_bill(to_input(payload)?).await?;
    Ok(created(BillCreatedData { bill_id: id }))
}

async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let (bills, total_count) = state.services.outwards.list_bills(&query).await?;
    Ok(success(BillListData { bills, total_count }))
}

async fn open_bills(
    State(state): State<AppState>,
    Query(query): Query<OpenBillsQuery>,
) -> Result<Response, ApiError> {
    let bills = state
        .services
        .outwards
        .open_bills_for_party(query.party_id)
        .await?;
    Ok(success(serde_json::json!({ "bills": bills })))
}

async fn update_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BillRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    for line in &payload.items {
        validate_input(line)?;
    }
    state
        .services
        .outwards
        .update_bill(id, to_input(payload)?)
        .await?;
    Ok(success_message("Bill updated"))
}

async fn delete_bill(
    State(state): State<AppState>,
    Query(query): Query<DeleteBillQuery>,
) -> Result<Response, ApiError> {
    state.services.outwards.delete_bill(query.bill_id).await?;
    Ok(success_message("Bill deleted"))
}
