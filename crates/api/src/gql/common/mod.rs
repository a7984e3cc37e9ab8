pub mod types;

pub use types::{PaginatedResponse, PaginationInput};
