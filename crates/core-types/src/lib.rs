pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use structs::{parse_stock_id, MutationResponse, NewStock, Stock};
