//! Shared HTTP plumbing: response envelope, pagination, error mapping
//! and the validating JSON extractor.

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::DomainError;

pub use validated_json::ValidatedJson;

/// Standard response wrapper.
///
/// Every REST endpoint returns its payload in this envelope.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request was handled successfully
    pub success: bool,
    /// Payload. `null` on failure
    pub data: Option<T>,
    /// Error description. `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map a domain error onto the HTTP status it surfaces as.
///
/// Conflicts and illegal state transitions both come back as 409; a
/// gateway decline is a 502 business failure, not a server fault.
pub fn error_response(err: DomainError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) | DomainError::InvalidState(_) => StatusCode::CONFLICT,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::External(_) => StatusCode::BAD_GATEWAY,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

/// Pagination query parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (1–100). Default: 50
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    50
}

impl PaginationParams {
    /// Clamp to sane bounds so a bad query cannot request page 0 or a
    /// ten-thousand-row page.
    pub fn normalized(&self) -> (u64, u64) {
        (self.page.max(1), self.limit.clamp(1, 100))
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, limit: 50 }
    }
}

/// Paginated list response: one page of items plus page metadata.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = total.div_ceil(limit.max(1));
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        let (status, _) = error_response(DomainError::not_found("Table", "id", 7));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = error_response(DomainError::Conflict("occupied".into()));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = error_response(DomainError::InvalidState("bad edge".into()));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = error_response(DomainError::External("declined".into()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _) = error_response(DomainError::Database("locked".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn pagination_normalization() {
        let params = PaginationParams { page: 0, limit: 5000 };
        assert_eq!(params.normalized(), (1, 100));

        let params = PaginationParams::default();
        assert_eq!(params.normalized(), (1, 50));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 101, 1, 50);
        assert_eq!(page.total_pages, 3);

        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 0, 1, 50);
        assert_eq!(page.total_pages, 0);
    }
}
