//! Menu module — public catalog browsing and staff catalog management

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
