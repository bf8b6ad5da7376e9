//! Order DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::order::{DayOrderStats, Order, OrderItem, OrderStatusCounts};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i32,
    pub menu_id: i32,
    pub menu_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub notes: Option<String>,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(i: OrderItem) -> Self {
        Self {
            id: i.id,
            menu_id: i.menu_id,
            menu_name: i.menu_name,
            quantity: i.quantity,
            unit_price: i.unit_price,
            subtotal: i.subtotal,
            notes: i.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub table_id: i32,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: Decimal,
    pub used_points: Decimal,
    /// What the customer pays: total_amount - used_points
    pub payment_amount: Decimal,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            table_id: o.table_id,
            items: o.items.into_iter().map(Into::into).collect(),
            total_amount: o.total_amount,
            used_points: o.used_points,
            payment_amount: o.payment_amount,
            status: o.status.to_string(),
            notes: o.notes,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(max = 500, message = "notes too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelOrderRequest {
    #[validate(length(min = 1, max = 200, message = "a cancellation reason is required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// PENDING, PREPARING, READY, COMPLETED or CANCELLED
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// Status filter for the staff order listing
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct OrderListQuery {
    /// Only orders in this status
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatusCountsResponse {
    pub pending: u64,
    pub preparing: u64,
    pub ready: u64,
    pub completed: u64,
    pub cancelled: u64,
}

impl From<OrderStatusCounts> for OrderStatusCountsResponse {
    fn from(c: OrderStatusCounts) -> Self {
        Self {
            pending: c.pending,
            preparing: c.preparing,
            ready: c.ready,
            completed: c.completed,
            cancelled: c.cancelled,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayOrderStatsResponse {
    pub total_orders: u64,
    pub completed_orders: u64,
    pub revenue: Decimal,
}

impl From<DayOrderStats> for DayOrderStatsResponse {
    fn from(s: DayOrderStats) -> Self {
        Self {
            total_orders: s.total_orders,
            completed_orders: s.completed_orders,
            revenue: s.revenue,
        }
    }
}
