//! Integration tests for CareFind
//!
//! These tests verify the interaction between the search service, the
//! oracle provider seam, and the web API: data flow, error mapping, and
//! interface contracts across crates.

#[path = "integration/support.rs"]
mod support;

#[path = "integration/service_flow.rs"]
mod service_flow;

#[path = "integration/web_api.rs"]
mod web_api;
