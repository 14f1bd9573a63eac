//! Provider implementations for oracle access.

use async_trait::async_trait;

use carefind_core::PackageRecord;

use crate::Result;

pub mod demo;
pub mod gateway;
#[cfg(test)]
pub mod mock;

pub use demo::DemoProvider;
pub use gateway::GatewayProvider;
#[cfg(test)]
pub use mock::MockProvider;

/// What the oracle handed back for a query.
///
/// Some gateways already structure their answer; others return the raw
/// generated prose that still needs extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleReply {
    /// Upstream already returned `{"packages": [...]}` - pass-through.
    Packages(Vec<PackageRecord>),
    /// Oracle-native shape containing generated text to be extracted.
    Generated(String),
}

/// Trait for generation-oracle providers.
///
/// Implementations reach the oracle through different backends (HTTP
/// gateway, canned demo data, scripted mocks for testing). One call per
/// query; any retrying is a caller decision.
#[async_trait]
pub trait OracleProvider: Send + Sync + std::fmt::Debug {
    /// Send one query to the oracle and classify its reply.
    ///
    /// # Errors
    /// - `OracleError::Timeout` - the oracle did not answer in time
    /// - `OracleError::Unreachable` - connection to the oracle failed
    /// - `OracleError::EndpointNotFound` - the endpoint answered 404
    /// - `OracleError::UpstreamFailure` - other non-2xx oracle status
    /// - `OracleError::MalformedResponse` - unusable 2xx body
    async fn retrieve_and_generate(&self, query: &str) -> Result<OracleReply>;
}
