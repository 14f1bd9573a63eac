//! CareFind Search - Oracle access and package search orchestration
//!
//! Talks to the external text-generation/retrieval oracle through an
//! injectable provider trait and turns its prose answers into structured
//! package records via the core extractor.

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]

pub mod errors;
pub mod providers;
pub mod service;

// Re-export main types
pub use errors::OracleError;
pub use providers::{DemoProvider, GatewayProvider, OracleProvider, OracleReply};
pub use service::PackageSearchService;

/// Convenience type alias for Results with OracleError.
pub type Result<T> = std::result::Result<T, OracleError>;
