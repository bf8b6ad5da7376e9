//! Order aggregate
//!
//! An order is an immutable-content snapshot of a cart plus a mutable
//! status. Item rows are copied from the cart at creation time (price
//! included), so later menu or cart edits never affect a placed order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "PREPARING" => Some(Self::Preparing),
            "READY" => Some(Self::Ready),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// The full edge table of the status machine. Everything not listed
    /// here is illegal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Preparing) | (Pending, Cancelled) | (Preparing, Ready) | (Ready, Completed)
        )
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one cart line at order time
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub menu_id: i32,
    /// Menu name at read time, joined in for display
    pub menu_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: i32,
    pub table_id: i32,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    /// Loyalty points applied against the total; zero for walk-in orders
    pub used_points: Decimal,
    /// What the customer actually pays: total_amount - used_points
    pub payment_amount: Decimal,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Recompute both amounts from the current items. The stored columns
    /// are never edited independently of the item rows.
    pub fn recalculate_amounts(&mut self) {
        self.total_amount = self.items.iter().map(|i| i.subtotal).sum();
        self.payment_amount = self.total_amount - self.used_points;
    }

    /// Advance the status along a legal edge; anything else fails and
    /// leaves the status untouched.
    pub fn transition(&mut self, next: OrderStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidState(format!(
                "order {} cannot go from {} to {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }

    pub fn can_cancel(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Customer/admin cancellation. Only a Pending order can be
    /// cancelled; the reason is appended to the order notes.
    pub fn cancel(&mut self, reason: &str) -> DomainResult<()> {
        self.transition(OrderStatus::Cancelled)?;
        self.append_note(&format!("[cancelled: {reason}]"));
        Ok(())
    }

    /// Refund-driven cancellation. A refund must cancel the order it paid
    /// for no matter how far preparation got, so this bypasses the
    /// Pending-only window.
    pub fn cancel_for_refund(&mut self, reason: &str) {
        self.status = OrderStatus::Cancelled;
        self.append_note(&format!("[refunded: {reason}]"));
    }

    fn append_note(&mut self, note: &str) {
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{existing} {note}"),
            _ => note.to_string(),
        });
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn order_item(menu_id: i32, quantity: i32, unit_price: i64) -> OrderItem {
        let unit_price = Decimal::from(unit_price);
        OrderItem {
            id: 0,
            order_id: 1,
            menu_id,
            menu_name: format!("menu-{menu_id}"),
            quantity,
            unit_price,
            subtotal: unit_price * Decimal::from(quantity),
            notes: None,
        }
    }

    fn pending_order() -> Order {
        let mut order = Order {
            id: 1,
            table_id: 1,
            items: vec![order_item(10, 3, 4500)],
            total_amount: Decimal::ZERO,
            used_points: Decimal::ZERO,
            payment_amount: Decimal::ZERO,
            status: OrderStatus::Pending,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        order.recalculate_amounts();
        order
    }

    #[test]
    fn amounts_recomputed_from_items() {
        let order = pending_order();
        assert_eq!(order.total_amount, Decimal::from(13_500));
        assert_eq!(order.payment_amount, Decimal::from(13_500));
    }

    #[test]
    fn used_points_reduce_payment_amount() {
        let mut order = pending_order();
        order.used_points = Decimal::from(500);
        order.recalculate_amounts();
        assert_eq!(order.total_amount, Decimal::from(13_500));
        assert_eq!(order.payment_amount, Decimal::from(13_000));
    }

    #[test]
    fn forward_chain_is_legal() {
        let mut order = pending_order();
        order.transition(OrderStatus::Preparing).unwrap();
        order.transition(OrderStatus::Ready).unwrap();
        order.transition(OrderStatus::Completed).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[test]
    fn illegal_edges_fail_and_leave_status() {
        let cases = [
            (OrderStatus::Pending, OrderStatus::Ready),
            (OrderStatus::Pending, OrderStatus::Completed),
            (OrderStatus::Preparing, OrderStatus::Pending),
            (OrderStatus::Preparing, OrderStatus::Cancelled),
            (OrderStatus::Ready, OrderStatus::Pending),
            (OrderStatus::Ready, OrderStatus::Cancelled),
            (OrderStatus::Completed, OrderStatus::Cancelled),
            (OrderStatus::Completed, OrderStatus::Pending),
            (OrderStatus::Cancelled, OrderStatus::Preparing),
        ];
        for (from, to) in cases {
            let mut order = pending_order();
            order.status = from;
            let err = order.transition(to).unwrap_err();
            assert!(matches!(err, DomainError::InvalidState(_)), "{from}->{to}");
            assert_eq!(order.status, from, "{from}->{to} must not change status");
        }
    }

    #[test]
    fn cancel_only_while_pending() {
        let mut order = pending_order();
        order.cancel("changed my mind").unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.notes.unwrap().contains("[cancelled: changed my mind]"));

        let mut order = pending_order();
        order.status = OrderStatus::Preparing;
        assert!(!order.can_cancel());
        assert!(order.cancel("too late").is_err());
        assert_eq!(order.status, OrderStatus::Preparing);
    }

    #[test]
    fn cancel_appends_to_existing_notes() {
        let mut order = pending_order();
        order.notes = Some("no ice".into());
        order.cancel("waited too long").unwrap();
        assert_eq!(
            order.notes.as_deref(),
            Some("no ice [cancelled: waited too long]")
        );
    }

    #[test]
    fn refund_cancellation_bypasses_window() {
        let mut order = pending_order();
        order.status = OrderStatus::Preparing;
        order.cancel_for_refund("cold coffee");
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.notes.unwrap().contains("[refunded: cold coffee]"));
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
    }

    #[test]
    fn status_roundtrip() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(OrderStatus::parse("DONE"), None);
    }
}
