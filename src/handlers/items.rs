use crate::errors::ApiError;
use crate::handlers::common::{created, success, success_message, validate_input, ListQuery};
use crate::services::items::{CreateItemInput, ItemDto};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    #[validate(length(min = 1, max = 50, message = "designNo is required"))]
    pub design_no: String,
    #[validate(length(min = 1, max = 100, message = "itemName is required"))]
    pub item_name: String,
    #[serde(rename = "vendorID", alias = "vendorId")]
    pub vendor_id: Uuid,
    pub item_photo: Option<String>,
    #[validate(custom = "crate::validation::validate_non_negative_amount")]
    pub manufacturing_cost: Decimal,
    #[validate(custom = "crate::validation::validate_non_negative_amount")]
    pub selling_price: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemQuery {
    #[serde(alias = "itemID")]
    pub item_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDropdownQuery {
    #[serde(alias = "vendorID")]
    pub vendor_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemListData {
    items: Vec<ItemDto>,
    total_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemCreatedData {
    #[serde(rename = "itemID")]
    item_id: Uuid,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(create_item))
        .route("/get", get(list_items))
        .route("/get-item-dropdown", get(item_options))
        .route("/update/:id", put(update_item))
        .route("/delete", delete(delete_item))
}

fn to_input(payload: ItemRequest) -> CreateItemInput {
    CreateItemInput {
        design_no: payload.design_no,
        item_name: payload.item_name,
        vendor_id: payload.vendor_id,
        item_photo: payload.item_photo,
        manufacturing_cost: payload.manufacturing_cost,
        selling_price: payload.selling_price,
        is_active: payload.is_active,
    }
}

async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    let id = state.services.items.create_item(to_input(payload)).await?;
    Ok(created(ItemCreatedData { item_id: id }))
}

async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let (items, total_count) = state.services.items.list_items(&query).await?;
    Ok(success(ItemListData { items, total_count }))
}

async fn item_options(
    State(state): State<AppState>,
    Query(query): Query<ItemDropdownQuery>,
) -> Result<Response, ApiError> {
    let items = state.services.items.items_for_vendor(query.vendor_id).await?;
    Ok(success(serde_json::json!({ "items": items })))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ItemRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;
    state.services.items.update_item(id, to_input(payload)).await?;
    Ok(success_message("Item updated"))
}

async fn delete_item(
    State(state): State<AppState>,
    Query(query): Query<DeleteItemQuery>,
) -> Result<Response, ApiError> {
    state.services.items.delete_item(query.item_id).await?;
    Ok(success_message("Item deleted"))
}
