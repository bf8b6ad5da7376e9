//! Order repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::model::{Order, OrderStatus};
use crate::domain::cart::Cart;
use crate::domain::table::CafeTable;
use crate::shared::DomainResult;

/// Open-order counts per status for the admin dashboard
#[derive(Debug, Clone, Default)]
pub struct OrderStatusCounts {
    pub pending: u64,
    pub preparing: u64,
    pub ready: u64,
    pub completed: u64,
    pub cancelled: u64,
}

/// Aggregates over one day of orders
#[derive(Debug, Clone)]
pub struct DayOrderStats {
    pub total_orders: u64,
    pub completed_orders: u64,
    pub revenue: Decimal,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Order>>;
    /// Non-terminal orders of one table, oldest first.
    async fn find_active_by_table(&self, table_id: i32) -> DomainResult<Vec<Order>>;
    /// All orders, newest first, optionally filtered by status.
    async fn list(
        &self,
        status: Option<OrderStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)>;

    /// Snapshot the cart into a new Pending order and delete the cart in
    /// the same transaction. The cart is re-read inside the transaction;
    /// if it emptied concurrently the call fails with Conflict and no
    /// order is created.
    async fn create_from_cart(
        &self,
        table_id: i32,
        cart: &Cart,
        notes: Option<String>,
    ) -> DomainResult<Order>;

    /// Persist status and notes of an already-transitioned order.
    async fn update_status(&self, order: &Order) -> DomainResult<()>;

    /// Persist an order completion together with the release of its
    /// table, as one atomic unit.
    async fn update_status_and_release_table(
        &self,
        order: &Order,
        table: &CafeTable,
    ) -> DomainResult<()>;

    async fn status_counts(&self) -> DomainResult<OrderStatusCounts>;
    async fn day_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<DayOrderStats>;
}
