pub mod cart_service;
pub mod cart_sweeper;
pub mod menu_service;
pub mod order_service;
pub mod payment_service;
pub mod table_service;

pub use cart_service::CartService;
pub use cart_sweeper::CartSweeper;
pub use menu_service::MenuService;
pub use order_service::OrderService;
pub use payment_service::PaymentService;
pub use table_service::TableService;

#[cfg(test)]
pub(crate) mod test_support;
