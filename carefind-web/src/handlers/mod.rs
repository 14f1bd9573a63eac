//! HTTP request handlers.

pub mod api;

// Re-export handler functions
pub use api::{api_health, api_search, extract_query};
