//! Payment module — settlement attempts and staff refunds

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
