//! Menu catalog entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menus")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub description: Option<String>,

    /// Current sale price; cart/order lines snapshot this at add time
    pub price: Decimal,

    pub category: Option<String>,

    pub image_url: Option<String>,

    pub is_available: bool,

    pub stock_quantity: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::menu_option::Entity")]
    MenuOption,
}

impl Related<super::menu_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
