//! Menu DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::menu::{Menu, MenuOption};

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Menu> for MenuResponse {
    fn from(m: Menu) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            category: m.category,
            image_url: m.image_url,
            is_available: m.is_available,
            stock_quantity: m.stock_quantity,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Menu with its add-on options, returned by the detail endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct MenuDetailResponse {
    #[serde(flatten)]
    pub menu: MenuResponse,
    pub options: Vec<MenuOptionResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuOptionResponse {
    pub id: i32,
    pub menu_id: i32,
    pub name: String,
    pub extra_price: Decimal,
    pub is_available: bool,
}

impl From<MenuOption> for MenuOptionResponse {
    fn from(o: MenuOption) -> Self {
        Self {
            id: o.id,
            menu_id: o.menu_id,
            name: o.name,
            extra_price: o.extra_price,
            is_available: o.is_available,
        }
    }
}

/// Filters for the public menu listing
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct MenuListQuery {
    /// Only menus in this category
    pub category: Option<String>,
    /// Case-insensitive substring match on the menu name
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMenuRequest {
    #[validate(length(min = 1, max = 100, message = "menu name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock_quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuRequest {
    #[validate(length(min = 1, max = 100, message = "menu name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock_quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuAvailabilityRequest {
    pub is_available: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMenuOptionRequest {
    #[validate(length(min = 1, max = 100, message = "option name is required"))]
    pub name: String,
    pub extra_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuOptionRequest {
    #[validate(length(min = 1, max = 100, message = "option name is required"))]
    pub name: String,
    pub extra_price: Decimal,
    pub is_available: bool,
}
