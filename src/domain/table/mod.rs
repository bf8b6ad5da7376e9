pub mod model;
pub mod repository;

pub use model::{CafeTable, TableStats, TableStatus};
pub use repository::TableRepository;
