//! SeaORM entities, one module per database table

pub mod cart;
pub mod cart_item;
pub mod menu;
pub mod menu_option;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod table;
pub mod user;
