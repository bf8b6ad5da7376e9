//! Payment repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::model::Payment;
use crate::domain::order::Order;
use crate::shared::DomainResult;

/// Aggregates over one day of completed payments
#[derive(Debug, Clone)]
pub struct DayPaymentStats {
    pub completed_count: u64,
    pub completed_amount: Decimal,
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>>;
    async fn find_by_order(&self, order_id: i32) -> DomainResult<Option<Payment>>;

    /// Persist the outcome of a payment attempt, together with the order
    /// status advance when the attempt succeeded, as one atomic unit.
    /// Inserts the payment row, or overwrites the order's existing
    /// non-completed row on a retry (`payment.id != 0`), keeping at most
    /// one payment per order. Returns the stored payment.
    async fn record_attempt(
        &self,
        payment: &Payment,
        order: Option<&Order>,
    ) -> DomainResult<Payment>;

    /// Persist a refunded payment and the cancellation of its order as
    /// one atomic unit.
    async fn record_refund(&self, payment: &Payment, order: &Order) -> DomainResult<()>;

    async fn day_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<DayPaymentStats>;
}
