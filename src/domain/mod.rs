//! Domain layer: aggregates, status machines and repository traits.
//!
//! Models are plain structs with the state-transition rules on them;
//! persistence is behind per-aggregate repository traits so services can
//! be exercised against any store.

pub mod cart;
pub mod menu;
pub mod order;
pub mod payment;
pub mod table;
pub mod user;

// Re-export commonly used types
pub use cart::{Cart, CartItem};
pub use menu::{Menu, MenuFilter, MenuOption};
pub use order::{DayOrderStats, Order, OrderItem, OrderStatus, OrderStatusCounts};
pub use payment::{DayPaymentStats, Payment, PaymentMethod, PaymentStatus};
pub use table::{CafeTable, TableStats, TableStatus};
pub use user::{User, UserRole};

pub use crate::shared::{DomainError, DomainResult};

use cart::CartRepository;
use menu::MenuRepository;
use order::OrderRepository;
use payment::PaymentRepository;
use table::TableRepository;
use user::UserRepository;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let table = repos.tables().find_by_qr_code("TABLE_AB12CD34EF56").await?;
///     let cart = repos.carts().find_by_table(table.id).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn tables(&self) -> &dyn TableRepository;
    fn menus(&self) -> &dyn MenuRepository;
    fn carts(&self) -> &dyn CartRepository;
    fn orders(&self) -> &dyn OrderRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn users(&self) -> &dyn UserRepository;
}
