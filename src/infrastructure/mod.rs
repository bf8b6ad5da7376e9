//! External concerns: persistence, crypto, the simulated payment gateway

pub mod crypto;
pub mod database;
pub mod gateway;

pub use database::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
pub use gateway::SimulatedPaymentGateway;
