//! Application layer: use-case services and outbound ports

pub mod gateway;
pub mod services;

pub use gateway::{GatewayDecision, PaymentGateway};
pub use services::{
    CartService, CartSweeper, MenuService, OrderService, PaymentService, TableService,
};
