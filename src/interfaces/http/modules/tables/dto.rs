//! Table DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::table::{CafeTable, TableStats};

#[derive(Debug, Serialize, ToSchema)]
pub struct TableResponse {
    pub id: i32,
    pub table_number: String,
    pub seat_count: i32,
    /// Token encoded in the table's QR code
    pub qr_code: String,
    pub location_description: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CafeTable> for TableResponse {
    fn from(t: CafeTable) -> Self {
        Self {
            id: t.id,
            table_number: t.table_number,
            seat_count: t.seat_count,
            qr_code: t.qr_code,
            location_description: t.location_description,
            status: t.status.to_string(),
            is_active: t.is_active,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTableRequest {
    #[validate(length(min = 1, max = 20, message = "table number is required"))]
    pub table_number: String,
    #[validate(range(min = 1, max = 50, message = "seat count must be 1–50"))]
    pub seat_count: i32,
    pub location_description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTableRequest {
    #[validate(length(min = 1, max = 20, message = "table number is required"))]
    pub table_number: String,
    #[validate(range(min = 1, max = 50, message = "seat count must be 1–50"))]
    pub seat_count: i32,
    pub location_description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTableStatusRequest {
    /// AVAILABLE, OCCUPIED or MAINTENANCE
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableStatsResponse {
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
    pub maintenance: u64,
    pub total_seats: i64,
}

impl From<TableStats> for TableStatsResponse {
    fn from(s: TableStats) -> Self {
        Self {
            total: s.total,
            available: s.available,
            occupied: s.occupied,
            maintenance: s.maintenance,
            total_seats: s.total_seats,
        }
    }
}
