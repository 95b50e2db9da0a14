pub mod loader;
pub mod models;

pub use loader::{ValidationError, load_config};
pub use models::*;
