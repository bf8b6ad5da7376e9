//! Cart DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::cart::{Cart, CartItem};

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub id: i32,
    pub menu_id: i32,
    pub menu_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub notes: Option<String>,
}

impl From<CartItem> for CartItemResponse {
    fn from(i: CartItem) -> Self {
        let subtotal = i.subtotal();
        Self {
            id: i.id,
            menu_id: i.menu_id,
            menu_name: i.menu_name,
            quantity: i.quantity,
            unit_price: i.unit_price,
            subtotal,
            notes: i.notes,
        }
    }
}

/// The current basket of a table. A table that has not added anything
/// yet gets an empty basket, not a 404.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub table_id: i32,
    pub items: Vec<CartItemResponse>,
    pub total_amount: Decimal,
    /// Total quantity across all lines
    pub item_count: i32,
}

impl CartResponse {
    pub fn empty(table_id: i32) -> Self {
        Self {
            table_id,
            items: vec![],
            total_amount: Decimal::ZERO,
            item_count: 0,
        }
    }
}

impl From<Cart> for CartResponse {
    fn from(c: Cart) -> Self {
        let total_amount = c.total();
        let item_count = c.item_count();
        Self {
            table_id: c.table_id,
            items: c.items.into_iter().map(Into::into).collect(),
            total_amount,
            item_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCartItemRequest {
    pub menu_id: i32,
    #[validate(range(min = 1, max = 99, message = "quantity must be 1–99"))]
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 1, max = 99, message = "quantity must be 1–99"))]
    pub quantity: i32,
}

/// Result of a manual empty-cart sweep
#[derive(Debug, Serialize, ToSchema)]
pub struct SweepResponse {
    pub removed: u64,
}
