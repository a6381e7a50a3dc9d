//! Shared response envelope and query-string shapes used by every handler.

use crate::errors::ApiError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

/// Every successful response carries this envelope. The embedded status code
/// always matches the HTTP status of the response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    pub status_code: u16,
    pub status_message: String,
    pub data: T,
}

pub fn success<T: Serialize>(data: T) -> Response {
    let body = Envelope {
        status_code: StatusCode::OK.as_u16(),
        status_message: "Success".to_string(),
        data,
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn created<T: Serialize>(data: T) -> Response {
    let body = Envelope {
        status_code: StatusCode::CREATED.as_u16(),
        status_message: "Created".to_string(),
        data,
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Success with no payload beyond a message.
pub fn success_message(message: &str) -> Response {
    let body = Envelope {
        status_code: StatusCode::OK.as_u16(),
        status_message: message.to_string(),
        data: json!(null),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Runs the derive-generated validators and surfaces the first failures as a
/// 400 naming the offending fields. Nothing is persisted when this fails.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input.validate().map_err(|errors| {
        let mut parts: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let detail = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{}: {}", field, detail)
            })
            .collect();
        parts.sort();
        ApiError::ValidationError(parts.join("; "))
    })
}

/// Pagination and search parameters common to the listing endpoints.
/// Page numbers are 1-based.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    pub search_filter: String,
    pub page_number: u64,
    pub page_size: u64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search_filter: String::new(),
            page_number: 1,
            page_size: 10,
        }
    }
}

impl ListQuery {
    pub fn limit(&self) -> u64 {
        self.page_size.clamp(1, 100)
    }

    pub fn offset(&self) -> u64 {
        self.page_number.saturating_sub(1) * self.limit()
    }
}

/// Pages needed to show `total_count` rows at `page_size` rows per page.
pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
    let size = page_size.max(1);
    total_count.div_ceil(size)
}

/// Accepts `YYYY-MM-DD`, with or without a trailing time component.
pub fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    let head = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", value))
    })
}

pub fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(parse_date(raw.trim())?)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_is_first_page_of_ten() {
        let query = ListQuery::default();
        assert_eq!(query.page_number, 1);
        assert_eq!(query.page_size, 10);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn offset_skips_earlier_pages() {
        let query = ListQuery {
            search_filter: String::new(),
            page_number: 3,
            page_size: 10,
        };
        assert_eq!(query.offset(), 20);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(total_pages(95, 10), 10);
        assert_eq!(total_pages(100, 10), 10);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn page_size_is_clamped() {
        let query = ListQuery {
            search_filter: String::new(),
            page_number: 2,
            page_size: 0,
        };
        assert_eq!(query.limit(), 1);
        assert_eq!(query.offset(), 1);

        let query = ListQuery {
            page_size: 1000,
            ..ListQuery::default()
        };
        assert_eq!(query.limit(), 100);
    }

    #[test]
    fn parses_plain_and_timestamped_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 4).unwrap();
        assert_eq!(parse_date("2025-10-04").unwrap(), expected);
        assert_eq!(parse_date("2025-10-04T00:00:00.000Z").unwrap(), expected);
        assert!(parse_date("04-10-2025").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn optional_date_treats_blank_as_absent() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some("  ")).unwrap(), None);
        assert!(parse_optional_date(Some("2025-01-01")).unwrap().is_some());
    }
}
