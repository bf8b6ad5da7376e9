//! Cart aggregate
//!
//! A cart is the pre-order basket of one table. It is created lazily on
//! the first item add and its rows are deleted when an order is created
//! from it, so an existing cart is always "the open basket" of its table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One line in a cart. At most one line per distinct menu: adding the
/// same menu again merges into the existing line.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub menu_id: i32,
    /// Menu name at read time, joined in for display
    pub menu_name: String,
    pub quantity: i32,
    /// Menu price captured when the line was first added
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

impl CartItem {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct Cart {
    pub id: i32,
    pub table_id: i32,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_item(&self, item_id: i32) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn find_item_by_menu(&self, menu_id: i32) -> Option<&CartItem> {
        self.items.iter().find(|i| i.menu_id == menu_id)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i32, menu_id: i32, quantity: i32, unit_price: i64) -> CartItem {
        CartItem {
            id,
            cart_id: 1,
            menu_id,
            menu_name: format!("menu-{menu_id}"),
            quantity,
            unit_price: Decimal::from(unit_price),
            notes: None,
        }
    }

    fn cart(items: Vec<CartItem>) -> Cart {
        Cart {
            id: 1,
            table_id: 1,
            items,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn subtotal_is_price_times_quantity() {
        let i = item(1, 10, 3, 4500);
        assert_eq!(i.subtotal(), Decimal::from(13_500));
    }

    #[test]
    fn total_sums_line_subtotals() {
        let c = cart(vec![item(1, 10, 2, 4500), item(2, 11, 1, 3000)]);
        assert_eq!(c.total(), Decimal::from(12_000));
        assert_eq!(c.item_count(), 3);
    }

    #[test]
    fn empty_cart_total_is_zero() {
        let c = cart(vec![]);
        assert!(c.is_empty());
        assert_eq!(c.total(), Decimal::ZERO);
        assert_eq!(c.item_count(), 0);
    }

    #[test]
    fn find_item_by_menu() {
        let c = cart(vec![item(1, 10, 2, 4500)]);
        assert!(c.find_item_by_menu(10).is_some());
        assert!(c.find_item_by_menu(99).is_none());
    }
}
