use crate::errors::ApiError;
use crate::handlers::common::{created, success, success_message, validate_input, ListQuery};
use crate::services::vendors::{CreateVendorInput, UpdateVendorInput, VendorDto, VendorOption};
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
pub struct VendorRequest {
    #[validate(length(min = 1, max = 100, message = "vendorName is required"))]
    pub vendor_name: String,
    #[validate(custom = "crate::validation::validate_gst_number")]
    pub gst_number: String,
    #[validate(custom = "crate::validation::validate_mobile_number")]
    pub mobile_no: String,
    #[validate(length(min = 1, max = 500, message = "address is required"))]
    pub address: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteVendorQuery {
    #[serde(alias = "vendorID")]
    pub vendor_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VendorListData {
    vendors: Vec<VendorDto>,
    total_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VendorCreatedData {
    #[serde(rename = "vendorID")]
    vendor_id: Uuid,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(create_vendor))
        .route("/get", get(list_vendors))
        .route("/get-all", get(vendor_options))
        .route("/update/:id", put(update_vendor))
        .route("/delete", delete(delete_vendor))
}

async fn create_vendor(
    State(state): State<AppState>,
    Json(payload): Json<VendorRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let id = state
        .services
        .vendors
        .create_vendor(CreateVendorInput {
            vendor_name: payload.vendor_name,
            gst_number: payload.gst_number,
            mobile_no: payload.mobile_no,
            address: payload.address,
            is_active: payload.is_active,
        })
        .await?;
    Ok(created(VendorCreatedData { vendor_id: id }))
}

async fn list_vendors(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let (vendors, total_count) = state.services.vendors.list_vendors(&query).await?;
    Ok(success(VendorListData {
        vendors,
        total_count,
    }))
}

async fn vendor_options(State(state): State<AppState>) -> Result<Response, ApiError> {
    let vendors: Vec<VendorOption> = state.services.vendors.vendor_options().await?;
    Ok(success(serde_json::json!({ "vendors": vendors })))
}

async fn update_vendor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VendorRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .vendors
        .update_vendor(
            id,
            UpdateVendorInput {
                vendor_name: payload.vendor_name,
                gst_number: payload.gst_number,
                mobile_no: payload.mobile_no,
                address: payload.address,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(success_message("Vendor updated"))
}

async fn delete_vendor(
    State(state): State<AppState>,
    Query(query): Query<DeleteVendorQuery>,
) -> Result<Response, ApiError> {
    state.services.vendors.delete_vendor(query.vendor_id).await?;
    Ok(success_message("Vendor deleted"))
}
