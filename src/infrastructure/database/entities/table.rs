//! Café table entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Occupancy state of a table
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TableStatus {
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    #[sea_orm(string_value = "OCCUPIED")]
    Occupied,
    #[sea_orm(string_value = "MAINTENANCE")]
    Maintenance,
}

impl Default for TableStatus {
    fn default() -> Self {
        Self::Available
    }
}

/// Physical seating unit identified by a QR code
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Human-facing table number (unique)
    #[sea_orm(unique)]
    pub table_number: String,

    pub seat_count: i32,

    /// Opaque QR token (unique)
    #[sea_orm(unique)]
    pub qr_code: String,

    pub location_description: Option<String>,

    pub status: TableStatus,

    /// Soft-delete flag
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
