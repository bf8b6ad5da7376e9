//! Menu repository interface

use async_trait::async_trait;

use super::model::{Menu, MenuOption};
use crate::shared::DomainResult;

/// Filters for the public menu listing
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub category: Option<String>,
    /// Case-insensitive substring match on the menu name
    pub search: Option<String>,
}

#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Menu>>;
    /// Currently sellable menus, customer-facing.
    async fn list_available(&self, filter: &MenuFilter) -> DomainResult<Vec<Menu>>;
    /// All menus including unavailable ones, paginated, admin-facing.
    async fn list_all(&self, page: u64, limit: u64) -> DomainResult<(Vec<Menu>, u64)>;
    async fn save(&self, menu: Menu) -> DomainResult<Menu>;
    async fn update(&self, menu: &Menu) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;

    async fn find_options(&self, menu_id: i32) -> DomainResult<Vec<MenuOption>>;
    async fn find_option_by_id(&self, option_id: i32) -> DomainResult<Option<MenuOption>>;
    async fn save_option(&self, option: MenuOption) -> DomainResult<MenuOption>;
    async fn update_option(&self, option: &MenuOption) -> DomainResult<()>;
    async fn delete_option(&self, option_id: i32) -> DomainResult<()>;
}
