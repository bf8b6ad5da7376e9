//! Menu catalog business logic

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::domain::menu::{Menu, MenuFilter, MenuOption};
use crate::domain::RepositoryProvider;
use crate::shared::{DomainError, DomainResult};

pub struct MenuService {
    repos: Arc<dyn RepositoryProvider>,
}

impl MenuService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn get(&self, id: i32) -> DomainResult<Menu> {
        self.repos
            .menus()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Menu", "id", id))
    }

    pub async fn list_available(&self, filter: MenuFilter) -> DomainResult<Vec<Menu>> {
        self.repos.menus().list_available(&filter).await
    }

    pub async fn list_all(&self, page: u64, limit: u64) -> DomainResult<(Vec<Menu>, u64)> {
        self.repos.menus().list_all(page, limit).await
    }

    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
        price: Decimal,
        category: Option<String>,
        image_url: Option<String>,
        stock_quantity: i32,
    ) -> DomainResult<Menu> {
        if price <= Decimal::ZERO {
            return Err(DomainError::Validation("price must be positive".into()));
        }
        if stock_quantity < 0 {
            return Err(DomainError::Validation(
                "stock_quantity must not be negative".into(),
            ));
        }

        let now = chrono::Utc::now();
        let menu = Menu {
            id: 0,
            name,
            description,
            price,
            category,
            image_url,
            is_available: true,
            stock_quantity,
            created_at: now,
            updated_at: now,
        };

        let saved = self.repos.menus().save(menu).await?;
        info!("Menu {} created at price {}", saved.name, saved.price);
        Ok(saved)
    }

    pub async fn update(
        &self,
        id: i32,
        name: String,
        description: Option<String>,
        price: Decimal,
        category: Option<String>,
        image_url: Option<String>,
        stock_quantity: i32,
    ) -> DomainResult<Menu> {
        if price <= Decimal::ZERO {
            return Err(DomainError::Validation("price must be positive".into()));
        }

        let mut menu = self.get(id).await?;
        menu.name = name;
        menu.description = description;
        menu.price = price;
        menu.category = category;
        menu.image_url = image_url;
        menu.stock_quantity = stock_quantity;

        self.repos.menus().update(&menu).await?;
        Ok(menu)
    }

    pub async fn set_availability(&self, id: i32, available: bool) -> DomainResult<Menu> {
        let mut menu = self.get(id).await?;
        if available {
            menu.make_available();
        } else {
            menu.make_unavailable();
        }
        self.repos.menus().update(&menu).await?;
        info!(
            "Menu {} is now {}",
            menu.name,
            if available { "available" } else { "unavailable" }
        );
        Ok(menu)
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.repos.menus().delete(id).await
    }

    // ── Options ────────────────────────────────────────────────

    pub async fn list_options(&self, menu_id: i32) -> DomainResult<Vec<MenuOption>> {
        // Surface a proper 404 for an unknown menu instead of an empty list
        self.get(menu_id).await?;
        self.repos.menus().find_options(menu_id).await
    }

    pub async fn add_option(
        &self,
        menu_id: i32,
        name: String,
        extra_price: Decimal,
    ) -> DomainResult<MenuOption> {
        if extra_price < Decimal::ZERO {
            return Err(DomainError::Validation(
                "extra_price must not be negative".into(),
            ));
        }
        self.get(menu_id).await?;

        let now = chrono::Utc::now();
        self.repos
            .menus()
            .save_option(MenuOption {
                id: 0,
                menu_id,
                name,
                extra_price,
                is_available: true,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    pub async fn update_option(
        &self,
        menu_id: i32,
        option_id: i32,
        name: String,
        extra_price: Decimal,
        is_available: bool,
    ) -> DomainResult<MenuOption> {
        let mut option = self
            .repos
            .menus()
            .find_option_by_id(option_id)
            .await?
            .filter(|o| o.menu_id == menu_id)
            .ok_or_else(|| DomainError::not_found("MenuOption", "id", option_id))?;

        option.name = name;
        option.extra_price = extra_price;
        option.is_available = is_available;
        self.repos.menus().update_option(&option).await?;
        Ok(option)
    }

    pub async fn delete_option(&self, menu_id: i32, option_id: i32) -> DomainResult<()> {
        let option = self
            .repos
            .menus()
            .find_option_by_id(option_id)
            .await?
            .filter(|o| o.menu_id == menu_id)
            .ok_or_else(|| DomainError::not_found("MenuOption", "id", option_id))?;

        self.repos.menus().delete_option(option.id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::super::test_support::setup_repos;
    use super::*;

    async fn service() -> MenuService {
        MenuService::new(setup_repos().await)
    }

    #[tokio::test]
    async fn create_and_fetch_menu() {
        let svc = service().await;
        let menu = svc
            .create(
                "americano".into(),
                Some("hot".into()),
                Decimal::from(4500),
                Some("coffee".into()),
                None,
                10,
            )
            .await
            .unwrap();

        let fetched = svc.get(menu.id).await.unwrap();
        assert_eq!(fetched.name, "americano");
        assert_eq!(fetched.price, Decimal::from(4500));
        assert!(fetched.is_available);
    }

    #[tokio::test]
    async fn non_positive_price_is_rejected() {
        let svc = service().await;
        let err = svc
            .create("freebie".into(), None, Decimal::ZERO, None, None, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn unavailable_menus_are_hidden_from_public_listing() {
        let svc = service().await;
        let menu = svc
            .create("latte".into(), None, Decimal::from(5000), None, None, 5)
            .await
            .unwrap();
        svc.create("mocha".into(), None, Decimal::from(5500), None, None, 5)
            .await
            .unwrap();

        svc.set_availability(menu.id, false).await.unwrap();

        let listed = svc.list_available(MenuFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "mocha");

        let (all, total) = svc.list_all(1, 50).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn search_filters_by_name() {
        let svc = service().await;
        svc.create("iced americano".into(), None, Decimal::from(5000), None, None, 5)
            .await
            .unwrap();
        svc.create("hot latte".into(), None, Decimal::from(5000), None, None, 5)
            .await
            .unwrap();

        let filter = MenuFilter {
            category: None,
            search: Some("americano".into()),
        };
        let listed = svc.list_available(filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "iced americano");
    }

    #[tokio::test]
    async fn options_belong_to_their_menu() {
        let svc = service().await;
        let menu = svc
            .create("latte".into(), None, Decimal::from(5000), None, None, 5)
            .await
            .unwrap();
        let other = svc
            .create("tea".into(), None, Decimal::from(4000), None, None, 5)
            .await
            .unwrap();

        let option = svc
            .add_option(menu.id, "extra shot".into(), Decimal::from(500))
            .await
            .unwrap();

        assert_eq!(svc.list_options(menu.id).await.unwrap().len(), 1);
        assert!(svc.list_options(other.id).await.unwrap().is_empty());

        // Option lookups are scoped to the owning menu
        let err = svc.delete_option(other.id, option.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        svc.delete_option(menu.id, option.id).await.unwrap();
        assert!(svc.list_options(menu.id).await.unwrap().is_empty());
    }
}
