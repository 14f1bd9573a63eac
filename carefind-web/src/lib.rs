//! CareFind Web - JSON API Server
//!
//! Thin axum front end over the package search service. Accepts free-text
//! search queries, proxies them to the oracle, and returns structured
//! package records as JSON.

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]

pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, router, run_server};
