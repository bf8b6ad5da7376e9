//! Cart business logic
//!
//! Preconditions live here, not in the aggregate: the table must be
//! active and occupied, the menu must be on sale. The repository applies
//! each mutation atomically.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::domain::cart::Cart;
use crate::domain::RepositoryProvider;
use crate::shared::{DomainError, DomainResult};

pub struct CartService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CartService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// The table's current cart; None when nothing has been added yet.
    pub async fn get_cart(&self, table_id: i32) -> DomainResult<Option<Cart>> {
        self.ensure_table(table_id).await?;
        self.repos.carts().find_by_table(table_id).await
    }

    pub async fn add_item(
        &self,
        table_id: i32,
        menu_id: i32,
        quantity: i32,
        notes: Option<String>,
    ) -> DomainResult<Cart> {
        if quantity < 1 {
            return Err(DomainError::Validation(
                "quantity must be at least 1".into(),
            ));
        }

        let table = self.ensure_table(table_id).await?;
        if !table.is_occupied() {
            return Err(DomainError::Conflict(format!(
                "table {} is not occupied",
                table.table_number
            )));
        }

        let menu = self
            .repos
            .menus()
            .find_by_id(menu_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Menu", "id", menu_id))?;
        if !menu.is_available {
            return Err(DomainError::Conflict(format!(
                "menu {} is not available",
                menu.name
            )));
        }

        let cart = self
            .repos
            .carts()
            .add_item(table_id, &menu, quantity, notes)
            .await?;
        info!(
            "Added {} x{} to cart of table {}",
            menu.name, quantity, table_id
        );
        Ok(cart)
    }

    pub async fn update_item_quantity(
        &self,
        table_id: i32,
        item_id: i32,
        quantity: i32,
    ) -> DomainResult<Cart> {
        if quantity < 1 {
            return Err(DomainError::Validation(
                "quantity must be at least 1".into(),
            ));
        }

        self.ensure_table(table_id).await?;

        let cart = self
            .repos
            .carts()
            .find_by_table(table_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Cart", "table_id", table_id))?;
        let item = cart
            .find_item(item_id)
            .ok_or_else(|| DomainError::not_found("CartItem", "id", item_id))?;

        // The menu may have been pulled from sale since it was added
        let menu = self
            .repos
            .menus()
            .find_by_id(item.menu_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Menu", "id", item.menu_id))?;
        if !menu.is_available {
            return Err(DomainError::Conflict(format!(
                "menu {} is not available",
                menu.name
            )));
        }

        self.repos
            .carts()
            .update_item_quantity(table_id, item_id, quantity)
            .await
    }

    pub async fn remove_item(&self, table_id: i32, item_id: i32) -> DomainResult<Cart> {
        self.ensure_table(table_id).await?;
        self.repos.carts().remove_item(table_id, item_id).await
    }

    pub async fn clear(&self, table_id: i32) -> DomainResult<()> {
        self.ensure_table(table_id).await?;
        self.repos.carts().clear(table_id).await
    }

    pub async fn total(&self, table_id: i32) -> DomainResult<Decimal> {
        Ok(self
            .get_cart(table_id)
            .await?
            .map(|c| c.total())
            .unwrap_or(Decimal::ZERO))
    }

    /// Drop carts that currently have zero items.
    pub async fn sweep_empty(&self) -> DomainResult<u64> {
        let removed = self.repos.carts().sweep_empty().await?;
        if removed > 0 {
            info!("Swept {} empty carts", removed);
        }
        Ok(removed)
    }

    async fn ensure_table(&self, table_id: i32) -> DomainResult<crate::domain::table::CafeTable> {
        self.repos
            .tables()
            .find_by_id(table_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Table", "id", table_id))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::super::table_service::TableService;
    use super::super::test_support::{seed_menu, setup_repos};
    use super::*;

    struct Fixture {
        carts: CartService,
        tables: TableService,
        repos: Arc<dyn RepositoryProvider>,
    }

    async fn fixture() -> Fixture {
        let repos = setup_repos().await;
        Fixture {
            carts: CartService::new(repos.clone()),
            tables: TableService::new(repos.clone()),
            repos,
        }
    }

    /// Create a table and scan it so it is occupied.
    async fn occupied_table(f: &Fixture) -> i32 {
        let t = f.tables.create("T1".into(), 4, None).await.unwrap();
        f.tables.scan_qr(&t.qr_code).await.unwrap();
        t.id
    }

    #[tokio::test]
    async fn add_to_unoccupied_table_conflicts() {
        let f = fixture().await;
        let t = f.tables.create("T1".into(), 4, None).await.unwrap();
        let menu = seed_menu(&f.repos, "americano", 4500).await;

        let err = f.carts.add_item(t.id, menu.id, 1, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn add_unavailable_menu_conflicts() {
        let f = fixture().await;
        let table_id = occupied_table(&f).await;
        let mut menu = seed_menu(&f.repos, "americano", 4500).await;
        menu.make_unavailable();
        f.repos.menus().update(&menu).await.unwrap();

        let err = f
            .carts
            .add_item(table_id, menu.id, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn adding_same_menu_twice_merges_lines() {
        let f = fixture().await;
        let table_id = occupied_table(&f).await;
        let menu = seed_menu(&f.repos, "americano", 4500).await;

        let cart = f.carts.add_item(table_id, menu.id, 2, None).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total(), Decimal::from(9000));

        let cart = f.carts.add_item(table_id, menu.id, 1, None).await.unwrap();
        assert_eq!(cart.items.len(), 1, "same menu must merge, not duplicate");
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.total(), Decimal::from(13_500));
    }

    #[tokio::test]
    async fn distinct_menus_get_their_own_lines() {
        let f = fixture().await;
        let table_id = occupied_table(&f).await;
        let americano = seed_menu(&f.repos, "americano", 4500).await;
        let latte = seed_menu(&f.repos, "latte", 5000).await;

        f.carts.add_item(table_id, americano.id, 1, None).await.unwrap();
        let cart = f.carts.add_item(table_id, latte.id, 2, None).await.unwrap();

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.total(), Decimal::from(14_500));
        assert_eq!(f.carts.total(table_id).await.unwrap(), Decimal::from(14_500));
    }

    #[tokio::test]
    async fn price_is_snapshotted_at_add_time() {
        let f = fixture().await;
        let table_id = occupied_table(&f).await;
        let mut menu = seed_menu(&f.repos, "americano", 4500).await;

        f.carts.add_item(table_id, menu.id, 2, None).await.unwrap();

        menu.price = Decimal::from(9999);
        f.repos.menus().update(&menu).await.unwrap();

        let cart = f.carts.get_cart(table_id).await.unwrap().unwrap();
        assert_eq!(cart.items[0].unit_price, Decimal::from(4500));
        assert_eq!(cart.total(), Decimal::from(9000));
    }

    #[tokio::test]
    async fn quantity_update_recomputes_total() {
        let f = fixture().await;
        let table_id = occupied_table(&f).await;
        let menu = seed_menu(&f.repos, "americano", 4500).await;

        let cart = f.carts.add_item(table_id, menu.id, 1, None).await.unwrap();
        let item_id = cart.items[0].id;

        let cart = f
            .carts
            .update_item_quantity(table_id, item_id, 4)
            .await
            .unwrap();
        assert_eq!(cart.items[0].quantity, 4);
        assert_eq!(cart.total(), Decimal::from(18_000));

        let err = f
            .carts
            .update_item_quantity(table_id, item_id, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let f = fixture().await;
        let table_id = occupied_table(&f).await;
        let americano = seed_menu(&f.repos, "americano", 4500).await;
        let latte = seed_menu(&f.repos, "latte", 5000).await;

        f.carts.add_item(table_id, americano.id, 1, None).await.unwrap();
        let cart = f.carts.add_item(table_id, latte.id, 1, None).await.unwrap();

        let item_id = cart.find_item_by_menu(americano.id).unwrap().id;
        let cart = f.carts.remove_item(table_id, item_id).await.unwrap();
        assert_eq!(cart.items.len(), 1);

        f.carts.clear(table_id).await.unwrap();
        assert!(f.carts.get_cart(table_id).await.unwrap().is_none());
        assert_eq!(f.carts.total(table_id).await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn item_of_another_table_is_not_reachable() {
        let f = fixture().await;
        let table_id = occupied_table(&f).await;
        let other = f.tables.create("T2".into(), 2, None).await.unwrap();
        f.tables.scan_qr(&other.qr_code).await.unwrap();

        let menu = seed_menu(&f.repos, "americano", 4500).await;
        let cart = f.carts.add_item(table_id, menu.id, 1, None).await.unwrap();
        let item_id = cart.items[0].id;

        f.carts.add_item(other.id, menu.id, 1, None).await.unwrap();

        let err = f
            .carts
            .update_item_quantity(other.id, item_id, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn sweep_removes_only_empty_carts() {
        let f = fixture().await;
        let table_id = occupied_table(&f).await;
        let other = f.tables.create("T2".into(), 2, None).await.unwrap();
        f.tables.scan_qr(&other.qr_code).await.unwrap();

        let menu = seed_menu(&f.repos, "americano", 4500).await;

        // A cart with an item and a cart emptied by item removal
        f.carts.add_item(table_id, menu.id, 1, None).await.unwrap();
        let cart = f.carts.add_item(other.id, menu.id, 1, None).await.unwrap();
        f.carts.remove_item(other.id, cart.items[0].id).await.unwrap();

        let removed = f.carts.sweep_empty().await.unwrap();
        assert_eq!(removed, 1);
        assert!(f.carts.get_cart(other.id).await.unwrap().is_none());
        assert!(f.carts.get_cart(table_id).await.unwrap().is_some());

        // Idempotent
        assert_eq!(f.carts.sweep_empty().await.unwrap(), 0);
    }
}
