pub mod model;
pub mod repository;

pub use model::{Cart, CartItem};
pub use repository::CartRepository;
