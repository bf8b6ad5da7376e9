//! SeaORM implementations of the domain repository traits

pub mod cart_repository;
pub mod menu_repository;
pub mod order_repository;
pub mod payment_repository;
pub mod repository_provider;
pub mod table_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::TransactionError;

use crate::shared::DomainError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

pub(crate) fn tx_err(e: TransactionError<DomainError>) -> DomainError {
    match e {
        TransactionError::Connection(e) => db_err(e),
        TransactionError::Transaction(e) => e,
    }
}
