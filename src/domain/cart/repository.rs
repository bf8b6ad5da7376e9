//! Cart repository interface
//!
//! The mutating operations are composite (merge-or-append, clear) and the
//! implementation must apply each one atomically: two concurrent adds of
//! the same menu to the same table must never produce two lines.

use async_trait::async_trait;

use super::model::Cart;
use crate::domain::menu::Menu;
use crate::shared::DomainResult;

#[async_trait]
pub trait CartRepository: Send + Sync {
    /// The open cart of a table, with its items, or None if no cart row
    /// exists yet.
    async fn find_by_table(&self, table_id: i32) -> DomainResult<Option<Cart>>;

    /// Add `quantity` of `menu` to the table's cart, creating the cart
    /// lazily and merging into an existing line for the same menu. The
    /// unit price is snapshotted from `menu.price` when a new line is
    /// created. Returns the cart after the change.
    async fn add_item(
        &self,
        table_id: i32,
        menu: &Menu,
        quantity: i32,
        notes: Option<String>,
    ) -> DomainResult<Cart>;

    /// Set the quantity of one line (must stay >= 1, checked by the
    /// service). Fails with NotFound if the item does not belong to the
    /// table's cart.
    async fn update_item_quantity(
        &self,
        table_id: i32,
        item_id: i32,
        quantity: i32,
    ) -> DomainResult<Cart>;

    /// Remove one line. Fails with NotFound if the item does not belong
    /// to the table's cart.
    async fn remove_item(&self, table_id: i32, item_id: i32) -> DomainResult<Cart>;

    /// Delete the table's cart and all its lines. A missing cart is fine.
    async fn clear(&self, table_id: i32) -> DomainResult<()>;

    /// Delete cart rows that currently have zero items. Returns how many
    /// carts were removed. Safe to run concurrently with cart mutation.
    async fn sweep_empty(&self) -> DomainResult<u64>;
}
