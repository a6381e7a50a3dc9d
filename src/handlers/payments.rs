use crate::errors::ApiError;
use crate::handlers::common::{
    created, parse_date, success, success_message, validate_input, ListQuery,
};
use crate::services::payments::{
    CreateBillPaymentInput, CreateVendorPaymentInput, VendorPaymentDto,
};
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BillPaymentRequest {
    #[serde(rename = "billID", alias = "billId")]
    pub bill_id: Uuid,
    #[serde(rename = "partyID", alias = "partyId")]
    pub party_id: Uuid,
    #[validate(custom = "crate::validation::validate_positive_amount")]
    pub amount_received: Decimal,
    pub received_date: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VendorPaymentRequest {
    #[serde(rename = "inwardID", alias = "inwardId")]
    pub inward_id: Uuid,
    #[validate(custom = "crate::validation::validate_positive_amount")]
    pub amount_paid: Decimal,
    pub paid_date: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteVendorPaymentQuery {
    #[serde(
        rename = "vendorPaymentId",
        alias = "paymentId",
        alias = "paymentID"
    )]
    pub payment_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VendorPaymentListData {
    payments: Vec<VendorPaymentDto>,
    total_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentCreatedData {
    #[serde(rename = "paymentID")]
    payment_id: Uuid,
}

pub fn bill_payment_routes() -> Router<AppState> {
    Router::new().route("/add", post(add_bill_payment))
}

pub fn vendor_payment_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_vendor_payment))
        .route("/get", get(list_vendor_payments))
        .route("/delete", delete(delete_vendor_payment))
}

async fn add_bill_payment(
    State(state): State<AppState>,
    Json(payload): Json<BillPaymentRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let received_date = parse_date(&payload.received_date)?;
    let id = state
        .services
        .payments
        .add_bill_payment(CreateBillPaymentInput {
            bill_id: payload.bill_id,
            party_id: payload.party_id,
            amount_received: payload.amount_received,
            received_date,
            remarks: payload.remarks,
        })
        .await?;
    Ok(created(PaymentCreatedData { payment_id: id }))
}

async fn add_vendor_payment(
    State(state): State<AppState>,
    Json(payload): Json<VendorPaymentRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let paid_date = parse_date(&payload.paid_date)?;
    let id = state
        .services
        .payments
        .add_vendor_payment(CreateVendorPaymentInput {
            inward_id: payload.inward_id,
            amount_paid: payload.amount_paid,
            paid_date,
            remarks: payload.remarks,
        })
        .await?;
    Ok(created(PaymentCreatedData { payment_id: id }))
}

async fn list_vendor_payments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let (payments, total_count) = state.services.payments.list_vendor_payments(&query).await?;
    Ok(success(VendorPaymentListData {
        payments,
        total_count,
    }))
}

async fn delete_vendor_payment(
    State(state): State<AppState>,
    Query(query): Query<DeleteVendorPaymentQuery>,
) -> Result<Response, ApiError> {
    state
        .services
        .payments
        .delete_vendor_payment(query.payment_id)
        .await?;
    Ok(success_message("Vendor payment deleted"))
}
