//! Cart module — per-table basket mutation and the manual sweep

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
