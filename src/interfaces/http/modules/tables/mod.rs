//! Table module — customer QR scan and staff table management

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
