//! Shared fixtures for service tests: an in-memory SQLite database with
//! the full schema applied.

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

use crate::domain::menu::Menu;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::SeaOrmRepositoryProvider;

/// Fresh in-memory database per test. A single pooled connection keeps
/// every query on the same in-memory store.
pub(crate) async fn setup_repos() -> Arc<dyn RepositoryProvider> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    Arc::new(SeaOrmRepositoryProvider::new(db))
}

/// Insert a menu priced in whole currency units.
pub(crate) async fn seed_menu(
    repos: &Arc<dyn RepositoryProvider>,
    name: &str,
    price: i64,
) -> Menu {
    let now = chrono::Utc::now();
    repos
        .menus()
        .save(Menu {
            id: 0,
            name: name.to_string(),
            description: None,
            price: Decimal::from(price),
            category: Some("coffee".to_string()),
            image_url: None,
            is_available: true,
            stock_quantity: 100,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("seed menu")
}
