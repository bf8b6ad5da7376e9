//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::cart::CartRepository;
use crate::domain::menu::MenuRepository;
use crate::domain::order::OrderRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::table::TableRepository;
use crate::domain::user::UserRepository;
use crate::domain::RepositoryProvider;

use super::cart_repository::SeaOrmCartRepository;
use super::menu_repository::SeaOrmMenuRepository;
use super::order_repository::SeaOrmOrderRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::table_repository::SeaOrmTableRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository
/// accessors:
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let table = repos.tables().find_by_qr_code("TABLE_AB12CD34EF56").await?;
/// let cart = repos.carts().find_by_table(table.id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    tables: SeaOrmTableRepository,
    menus: SeaOrmMenuRepository,
    carts: SeaOrmCartRepository,
    orders: SeaOrmOrderRepository,
    payments: SeaOrmPaymentRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            tables: SeaOrmTableRepository::new(db.clone()),
            menus: SeaOrmMenuRepository::new(db.clone()),
            carts: SeaOrmCartRepository::new(db.clone()),
            orders: SeaOrmOrderRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn tables(&self) -> &dyn TableRepository {
        &self.tables
    }

    fn menus(&self) -> &dyn MenuRepository {
        &self.menus
    }

    fn carts(&self) -> &dyn CartRepository {
        &self.carts
    }

    fn orders(&self) -> &dyn OrderRepository {
        &self.orders
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
