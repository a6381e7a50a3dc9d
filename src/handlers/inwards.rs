use crate::errors::ApiError;
use crate::handlers::common::{
    created, parse_date, success, success_message, validate_input, ListQuery,
};
use crate::services::inwards::{
    CreateInwardInput, InwardDto, InwardOption, OpeningPaymentInput, UpdateInwardInput,
};
use crate::services::LineItemInput;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Serialize is needed because the length validator on `items` records the
// offending value as an error param.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    #[serde(rename = "itemID", alias = "itemId")]
    pub item_id: Uuid,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom = "crate::validation::validate_non_negative_amount")]
    pub price: Decimal,
}

impl LineItemRequest {
    pub fn into_input(self) -> LineItemInput {
        LineItemInput {
            item_id: self.item_id,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInwardRequest {
    #[serde(rename = "vendorID", alias = "vendorId")]
    pub vendor_id: Uuid,
    #[validate(length(min = 1, max = 50, message = "billNo is required"))]
    pub bill_no: String,
    #[validate(length(min = 1, max = 50, message = "challanNo is required"))]
    pub challan_no: String,
    pub note: Option<String>,
    pub inward_date: String,
    #[validate(length(min = 1, message = "items must not be empty"))]
    pub items: Vec<LineItemRequest>,
    pub amount_paid: Option<Decimal>,
    pub paid_date: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInwardRequest {
    #[serde(rename = "vendorID", alias = "vendorId")]
    pub vendor_id: Uuid,
    #[validate(length(min = 1, max = 50, message = "billNo is required"))]
    pub bill_no: String,
    #[validate(length(min = 1, max = 50, message = "challanNo is required"))]
    pub challan_no: String,
    pub note: Option<String>,
    pub inward_date: String,
    #[validate(length(min = 1, message = "items must not be empty"))]
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteInwardQuery {
    #[serde(alias = "inwardID")]
    pub inward_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InwardDropdownQuery {
    #[serde(alias = "vendorID")]
    pub vendor_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InwardListData {
    inwards: Vec<InwardDto>,
    total_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InwardCreatedData {
    #[serde(rename = "inwardID")]
    inward_id: Uuid,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(create_inward))
        .route("/get", get(list_inwards))
        .route("/get-inward-dropdown", get(inward_dropdown))
        .route("/update/:id", put(update_inward))
        .route("/delete", delete(delete_inward))
}

async fn create_inward(
    State(state): State<AppState>,
    Json(payload): Json<CreateInwardRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    for line in &payload.items {
        validate_input(line)?;
    }

    let inward_date = parse_date(&payload.inward_date)?;
    let opening_payment = match payload.amount_paid {
        Some(amount) if amount > Decimal::ZERO => {
            let paid_date = match payload.paid_date.as_deref() {
                Some(raw) => parse_date(raw)?,
                None => inward_date,
            };
            Some(OpeningPaymentInput {
                amount_paid: amount,
                paid_date,
                remarks: payload.remarks,
            })
        }
        _ => None,
    };

    let id = state
        .services
        .inwards
        .create_inward(CreateInwardInput {
            vendor_id: payload.vendor_id,
            bill_no: payload.bill_no,
            challan_no: payload.challan_no,
            note: payload.note,
            inward_date,
            items: payload
                .items
                .into_iter()
                .map(LineItemRequest::into_input)
                .collect(),
            opening_payment,
        })
        .await?;
    Ok(created(InwardCreatedData { inward_id: id }))
}

async fn list_inwards(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let (inwards, total_count) = state.services.inwards.list_inwards(&query).await?;
    Ok(success(InwardListData {
        inwards,
        total_count,
    }))
}

async fn inward_dropdown(
    State(state): State<AppState>,
    Query(query): Query<InwardDropdownQuery>,
) -> Result<Response, ApiError> {
    let inwards: Vec<InwardOption> = state
        .services
        .inwards
        .inward_options(query.vendor_id)
        .await?;
    Ok(success(serde_json::json!({ "inwards": inwards })))
}

async fn update_inward(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInwardRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    for line in &payload.items {
        validate_input(line)?;
    }
    let inward_date = parse_date(&payload.inward_date)?;
    state
        .services
        .inwards
        .update_inward(
            id,
            UpdateInwardInput {
                vendor_id: payload.vendor_id,
                bill_no: payload.bill_no,
                challan_no: payload.challan_no,
                note: payload.note,
                inward_date,
                items: payload
                    .items
                    .into_iter()
                    .map(LineItemRequest::into_input)
                    .collect(),
            },
        )
        .await?;
    Ok(success_message("Inward bill updated"))
}

async fn delete_inward(
    State(state): State<AppState>,
    Query(query): Query<DeleteInwardQuery>,
) -> Result<Response, ApiError> {
    state.services.inwards.delete_inward(query.inward_id).await?;
    Ok(success_message("Inward bill deleted"))
}
