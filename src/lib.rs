//! # Brewtab
//!
//! Café table-ordering backend: customers scan a per-table QR code,
//! build a cart, place an order and pay; staff manage tables, menus,
//! orders and refunds over a JWT-protected admin API.
//!
//! ## Architecture
//!
//! - **domain**: aggregates, status machines and repository traits
//! - **application**: use-case services and the payment gateway port
//! - **infrastructure**: SeaORM persistence, crypto, simulated gateway
//! - **interfaces**: HTTP REST API with Swagger documentation
//! - **shared**: the error taxonomy

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
