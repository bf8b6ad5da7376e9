//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_tables;
mod m20250301_000002_create_users;
mod m20250301_000003_create_menus;
mod m20250301_000004_create_menu_options;
mod m20250301_000005_create_carts;
mod m20250301_000006_create_cart_items;
mod m20250301_000007_create_orders;
mod m20250301_000008_create_order_items;
mod m20250301_000009_create_payments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_tables::Migration),
            Box::new(m20250301_000002_create_users::Migration),
            Box::new(m20250301_000003_create_menus::Migration),
            Box::new(m20250301_000004_create_menu_options::Migration),
            Box::new(m20250301_000005_create_carts::Migration),
            Box::new(m20250301_000006_create_cart_items::Migration),
            Box::new(m20250301_000007_create_orders::Migration),
            Box::new(m20250301_000008_create_order_items::Migration),
            Box::new(m20250301_000009_create_payments::Migration),
        ]
    }
}
