use crate::errors::ApiError;
use crate::handlers::common::{parse_optional_date, success, ListQuery};
use crate::services::reports::{DateRange, PartySalesRow, StockRow, VendorInwardRow};
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

/// Listing parameters plus the optional date window. Kept flat because the
/// query extractor cannot see through nested shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportQuery {
    pub search_filter: String,
    pub page_number: u64,
    pub page_size: u64,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            search_filter: String::new(),
            page_number: 1,
            page_size: 10,
            from_date: None,
            to_date: None,
        }
    }
}

impl ReportQuery {
    fn list(&self) -> ListQuery {
        ListQuery {
            search_filter: self.search_filter.clone(),
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }

    fn range(&self) -> Result<DateRange, ApiError> {
        Ok(DateRange {
            from_date: parse_optional_date(self.from_date.as_deref())?,
            to_date: parse_optional_date(self.to_date.as_deref())?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PartySalesData {
    parties: Vec<PartySalesRow>,
    total_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VendorInwardData {
    vendors: Vec<VendorInwardRow>,
    total_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockData {
    items: Vec<StockRow>,
    total_count: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/get-partySalesReport", get(party_sales_report))
        .route("/get-vendorInwardReport", get(vendor_inward_report))
        .route("/get-stockReport", get(stock_report))
        .route("/get-dashboard", get(dashboard))
}

async fn party_sales_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let range = query.range()?;
    let (parties, total_count) = state
        .services
        .reports
        .party_sales_report(&query.list(), range)
        .await?;
    Ok(success(PartySalesData {
        parties,
        total_count,
    }))
}

async fn vendor_inward_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let range = query.range()?;
    let (vendors, total_count) = state
        .services
        .reports
        .vendor_inward_report(&query.list(), range)
        .await?;
    Ok(success(VendorInwardData {
        vendors,
        total_count,
    }))
}

async fn stock_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let (items, total_count) = state.services.reports.stock_report(&query.list()).await?;
    Ok(success(StockData { items, total_count }))
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let range = query.range()?;
    let summary = state.services.reports.dashboard(range).await?;
    Ok(success(summary))
}
