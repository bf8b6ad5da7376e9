pub mod model;
pub mod repository;

pub use model::{Menu, MenuOption};
pub use repository::{MenuFilter, MenuRepository};
