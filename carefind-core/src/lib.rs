//! CareFind Core - Health-checkup package domain logic
//!
//! Provides the package record model, query enrichment, and the
//! free-text response extractor that turns generated prose into
//! structured package records. No I/O lives in this crate.

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]

pub mod config;
pub mod enrich;
pub mod extract;
pub mod types;

// Re-export main types
pub use config::{ConfigError, OracleConfig};
pub use enrich::{enrich, widen};
pub use extract::{ExtractionError, extract};
pub use types::{PackageRecord, is_fallback_only};
