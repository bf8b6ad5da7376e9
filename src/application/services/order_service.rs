//! Order business logic
//!
//! Cross-entity side effects are orchestrated here: completing an order
//! loads the owning table, applies both transitions and persists them in
//! one atomic unit instead of mutating through the object graph.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use crate::domain::order::{DayOrderStats, Order, OrderStatus, OrderStatusCounts};
use crate::domain::RepositoryProvider;
use crate::shared::{DomainError, DomainResult};

pub struct OrderService {
    repos: Arc<dyn RepositoryProvider>,
}

impl OrderService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Snapshot the table's cart into a new Pending order; the cart is
    /// drained in the same transaction.
    pub async fn create_from_cart(
        &self,
        table_id: i32,
        notes: Option<String>,
    ) -> DomainResult<Order> {
        let table = self
            .repos
            .tables()
            .find_by_id(table_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Table", "id", table_id))?;
        if !table.is_occupied() {
            return Err(DomainError::Conflict(format!(
                "table {} is not occupied",
                table.table_number
            )));
        }

        let cart = self
            .repos
            .carts()
            .find_by_table(table_id)
            .await?
            .ok_or_else(|| DomainError::Conflict("cart is empty, nothing to order".into()))?;
        if cart.is_empty() {
            return Err(DomainError::Conflict(
                "cart is empty, nothing to order".into(),
            ));
        }

        let order = self
            .repos
            .orders()
            .create_from_cart(table_id, &cart, notes)
            .await?;
        info!(
            "Order {} placed for table {} (total {})",
            order.id, table.table_number, order.total_amount
        );
        Ok(order)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Order> {
        self.repos
            .orders()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", "id", id))
    }

    pub async fn active_for_table(&self, table_id: i32) -> DomainResult<Vec<Order>> {
        self.repos
            .tables()
            .find_by_id(table_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Table", "id", table_id))?;
        self.repos.orders().find_active_by_table(table_id).await
    }

    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)> {
        self.repos.orders().list(status, page, limit).await
    }

    /// Staff status change. Completion additionally frees the owning
    /// table; both writes land in one atomic unit.
    pub async fn update_status(&self, order_id: i32, next: OrderStatus) -> DomainResult<Order> {
        let mut order = self.get(order_id).await?;

        match next {
            OrderStatus::Completed => {
                order.transition(OrderStatus::Completed)?;

                match self.repos.tables().find_by_id(order.table_id).await? {
                    Some(mut table) => {
                        table.make_available();
                        self.repos
                            .orders()
                            .update_status_and_release_table(&order, &table)
                            .await?;
                    }
                    // Table was soft-deleted meanwhile; complete the order alone
                    None => self.repos.orders().update_status(&order).await?,
                }
            }
            OrderStatus::Cancelled => {
                order.cancel("cancelled by staff")?;
                self.repos.orders().update_status(&order).await?;
            }
            _ => {
                order.transition(next)?;
                self.repos.orders().update_status(&order).await?;
            }
        }

        info!("Order {} moved to {}", order.id, order.status);
        Ok(order)
    }

    /// Customer cancellation, only while the order is still Pending.
    pub async fn cancel(&self, order_id: i32, reason: &str) -> DomainResult<Order> {
        let mut order = self.get(order_id).await?;
        order.cancel(reason)?;
        self.repos.orders().update_status(&order).await?;
        info!("Order {} cancelled: {}", order.id, reason);
        Ok(order)
    }

    pub async fn status_counts(&self) -> DomainResult<OrderStatusCounts> {
        self.repos.orders().status_counts().await
    }

    pub async fn today_stats(&self) -> DomainResult<DayOrderStats> {
        let start = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc();
        let end = start + Duration::days(1);
        self.repos.orders().day_stats(start, end).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::super::cart_service::CartService;
    use super::super::table_service::TableService;
    use super::super::test_support::{seed_menu, setup_repos};
    use super::*;
    use crate::domain::table::TableStatus;

    struct Fixture {
        orders: OrderService,
        carts: CartService,
        tables: TableService,
        repos: Arc<dyn RepositoryProvider>,
    }

    async fn fixture() -> Fixture {
        let repos = setup_repos().await;
        Fixture {
            orders: OrderService::new(repos.clone()),
            carts: CartService::new(repos.clone()),
            tables: TableService::new(repos.clone()),
            repos,
        }
    }

    /// Occupied table with americano x3 (4500 each) in the cart.
    async fn table_with_cart(f: &Fixture) -> i32 {
        let t = f.tables.create("T1".into(), 4, None).await.unwrap();
        f.tables.scan_qr(&t.qr_code).await.unwrap();
        let menu = seed_menu(&f.repos, "americano", 4500).await;
        f.carts.add_item(t.id, menu.id, 2, None).await.unwrap();
        f.carts.add_item(t.id, menu.id, 1, None).await.unwrap();
        t.id
    }

    #[tokio::test]
    async fn order_snapshots_cart_and_clears_it() {
        let f = fixture().await;
        let table_id = table_with_cart(&f).await;

        let cart_total = f.carts.total(table_id).await.unwrap();
        assert_eq!(cart_total, Decimal::from(13_500));

        let order = f
            .orders
            .create_from_cart(table_id, Some("no sugar".into()))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, cart_total);
        assert_eq!(order.payment_amount, cart_total);
        assert_eq!(order.used_points, Decimal::ZERO);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.notes.as_deref(), Some("no sugar"));

        // Source cart is gone
        assert!(f.carts.get_cart(table_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn order_from_empty_or_missing_cart_conflicts() {
        let f = fixture().await;
        let t = f.tables.create("T1".into(), 4, None).await.unwrap();
        f.tables.scan_qr(&t.qr_code).await.unwrap();

        let err = f.orders.create_from_cart(t.id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn order_on_unoccupied_table_conflicts() {
        let f = fixture().await;
        let t = f.tables.create("T1".into(), 4, None).await.unwrap();

        let err = f.orders.create_from_cart(t.id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn order_items_keep_snapshot_price() {
        let f = fixture().await;
        let table_id = table_with_cart(&f).await;
        let order = f.orders.create_from_cart(table_id, None).await.unwrap();

        // Repricing the menu later must not change the placed order
        let mut menu = f
            .repos
            .menus()
            .find_by_id(order.items[0].menu_id)
            .await
            .unwrap()
            .unwrap();
        menu.price = Decimal::from(99_999);
        f.repos.menus().update(&menu).await.unwrap();

        let reloaded = f.orders.get(order.id).await.unwrap();
        assert_eq!(reloaded.items[0].unit_price, Decimal::from(4500));
        assert_eq!(reloaded.total_amount, Decimal::from(13_500));
    }

    #[tokio::test]
    async fn illegal_status_jump_is_rejected() {
        let f = fixture().await;
        let table_id = table_with_cart(&f).await;
        let order = f.orders.create_from_cart(table_id, None).await.unwrap();

        let err = f
            .orders
            .update_status(order.id, OrderStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        // Status unchanged in the store
        let reloaded = f.orders.get(order.id).await.unwrap();
        assert_eq!(reloaded.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn completion_frees_the_table() {
        let f = fixture().await;
        let table_id = table_with_cart(&f).await;
        let order = f.orders.create_from_cart(table_id, None).await.unwrap();

        f.orders
            .update_status(order.id, OrderStatus::Preparing)
            .await
            .unwrap();
        f.orders
            .update_status(order.id, OrderStatus::Ready)
            .await
            .unwrap();
        f.orders
            .update_status(order.id, OrderStatus::Completed)
            .await
            .unwrap();

        let table = f.tables.get(table_id).await.unwrap();
        assert_eq!(table.status, TableStatus::Available);

        let reloaded = f.orders.get(order.id).await.unwrap();
        assert_eq!(reloaded.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn customer_cancel_only_while_pending() {
        let f = fixture().await;
        let table_id = table_with_cart(&f).await;
        let order = f.orders.create_from_cart(table_id, None).await.unwrap();

        f.orders
            .update_status(order.id, OrderStatus::Preparing)
            .await
            .unwrap();

        let err = f.orders.cancel(order.id, "changed my mind").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn cancel_records_reason_in_notes() {
        let f = fixture().await;
        let table_id = table_with_cart(&f).await;
        let order = f.orders.create_from_cart(table_id, None).await.unwrap();

        let cancelled = f.orders.cancel(order.id, "waited too long").await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let reloaded = f.orders.get(order.id).await.unwrap();
        assert!(reloaded
            .notes
            .unwrap()
            .contains("[cancelled: waited too long]"));
    }

    #[tokio::test]
    async fn active_orders_exclude_terminal_ones() {
        let f = fixture().await;
        let table_id = table_with_cart(&f).await;
        let order = f.orders.create_from_cart(table_id, None).await.unwrap();
        f.orders.cancel(order.id, "mistake").await.unwrap();

        assert!(f
            .orders
            .active_for_table(table_id)
            .await
            .unwrap()
            .is_empty());

        let counts = f.orders.status_counts().await.unwrap();
        assert_eq!(counts.cancelled, 1);
        assert_eq!(counts.pending, 0);
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let f = fixture().await;
        let table_id = table_with_cart(&f).await;
        f.orders.create_from_cart(table_id, None).await.unwrap();

        let (pending, total) = f
            .orders
            .list(Some(OrderStatus::Pending), 1, 50)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(pending.len(), 1);

        let (completed, total) = f
            .orders
            .list(Some(OrderStatus::Completed), 1, 50)
            .await
            .unwrap();
        assert_eq!(total, 0);
        assert!(completed.is_empty());
    }

    #[tokio::test]
    async fn today_stats_count_completed_revenue() {
        let f = fixture().await;
        let table_id = table_with_cart(&f).await;
        let order = f.orders.create_from_cart(table_id, None).await.unwrap();
        f.orders
            .update_status(order.id, OrderStatus::Preparing)
            .await
            .unwrap();
        f.orders
            .update_status(order.id, OrderStatus::Ready)
            .await
            .unwrap();
        f.orders
            .update_status(order.id, OrderStatus::Completed)
            .await
            .unwrap();

        let stats = f.orders.today_stats().await.unwrap();
        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.revenue, Decimal::from(13_500));
    }
}
