//! Menu catalog entities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A sellable catalog entry. Cart and order lines reference menus by id
/// but snapshot the price at add time, so later price edits never touch
/// existing lines.
#[derive(Debug, Clone)]
pub struct Menu {
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

impl Menu {
    pub fn make_available(&mut self) {
        self.is_available = true;
    }

    pub fn make_unavailable(&mut self) {
        self.is_available = false;
    }
}

/// Optional add-on belonging to one menu (e.g. extra shot, oat milk)
#[derive(Debug, Clone)]
pub struct MenuOption {
    pub id: i32,
    pub menu_id: i32,
    pub name: String,
    pub extra_price: Decimal,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
