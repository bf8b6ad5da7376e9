pub mod model;
pub mod repository;

pub use model::{Order, OrderItem, OrderStatus};
pub use repository::{DayOrderStats, OrderRepository, OrderStatusCounts};
