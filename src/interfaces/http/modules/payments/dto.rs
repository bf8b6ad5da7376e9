//! Payment DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::payment::{DayPaymentStats, Payment};

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i32,
    pub order_id: i32,
    pub method: String,
    pub amount: Decimal,
    pub status: String,
    pub transaction_id: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            order_id: p.order_id,
            method: p.method.to_string(),
            amount: p.amount,
            status: p.status.to_string(),
            transaction_id: p.transaction_id,
            paid_at: p.paid_at,
            failure_reason: p.failure_reason,
            created_at: p.created_at,
        }
    }
}

/// One settlement attempt. The amount must equal the order's
/// payment_amount exactly.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PaymentRequest {
    pub order_id: i32,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefundRequest {
    #[validate(length(min = 1, max = 200, message = "a refund reason is required"))]
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayPaymentStatsResponse {
    pub completed_count: u64,
    pub completed_amount: Decimal,
}

impl From<DayPaymentStats> for DayPaymentStatsResponse {
    fn from(s: DayPaymentStats) -> Self {
        Self {
            completed_count: s.completed_count,
            completed_amount: s.completed_amount,
        }
    }
}
