//! Package search orchestration.
//!
//! Wires query enrichment, the oracle provider, and the response extractor
//! into the single search operation the web layer exposes.

use tracing::{debug, info, warn};

use carefind_core::{OracleConfig, PackageRecord, enrich, extract, is_fallback_only, widen};

use crate::Result;
use crate::errors::OracleError;
use crate::providers::{DemoProvider, GatewayProvider, OracleProvider, OracleReply};

/// Package search service orchestrating one oracle round-trip per query,
/// plus at most one deliberate widened re-query when the first extraction
/// produced only the fallback record.
#[derive(Debug)]
pub struct PackageSearchService {
    provider: Box<dyn OracleProvider>,
    widen_on_fallback: bool,
}

impl PackageSearchService {
    /// Service backed by the production HTTP gateway provider.
    ///
    /// # Errors
    /// - `OracleError::Unreachable` - the HTTP client could not be constructed
    pub fn new(config: OracleConfig) -> Result<Self> {
        let widen_on_fallback = config.widen_on_fallback;
        Ok(Self {
            provider: Box::new(GatewayProvider::new(config)?),
            widen_on_fallback,
        })
    }

    /// Service backed by canned demo data for development.
    pub fn new_demo() -> Self {
        Self {
            provider: Box::new(DemoProvider::new()),
            widen_on_fallback: false,
        }
    }

    /// Service backed by an arbitrary provider (testing, alternate oracles).
    pub fn with_provider(provider: Box<dyn OracleProvider>, widen_on_fallback: bool) -> Self {
        Self {
            provider,
            widen_on_fallback,
        }
    }

    /// Search for health-checkup packages matching a free-text query.
    ///
    /// The query is enriched, sent to the oracle once, and the reply is
    /// structured into records. Extraction faults are recovered locally
    /// into the diagnostic fallback record and never fail the request.
    ///
    /// # Errors
    /// - `OracleError::InvalidQuery` - the query was empty or blank
    /// - `OracleError::Timeout` - the oracle did not answer in time
    /// - `OracleError::Unreachable` - connection to the oracle failed
    /// - `OracleError::EndpointNotFound` - the endpoint answered 404
    /// - `OracleError::UpstreamFailure` - other non-2xx oracle status
    /// - `OracleError::MalformedResponse` - unusable oracle body
    pub async fn search_packages(&self, query: &str) -> Result<Vec<PackageRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(OracleError::InvalidQuery {
                reason: "query must not be empty".to_string(),
            });
        }

        let enriched = enrich(query);
        debug!(%enriched, "querying oracle");

        let reply = self.provider.retrieve_and_generate(&enriched).await?;
        let packages = structure_reply(reply);

        if self.widen_on_fallback && is_fallback_only(&packages) {
            info!("first extraction was fallback-only, sending one widened re-query");
            match self.provider.retrieve_and_generate(&widen(query)).await {
                Ok(reply) => {
                    let widened = structure_reply(reply);
                    if !is_fallback_only(&widened) {
                        return Ok(widened);
                    }
                }
                Err(e) => {
                    // The first answer already stands; a failed widening
                    // attempt is logged and swallowed.
                    warn!(error = %e, "widened re-query failed, keeping first result");
                }
            }
        }

        Ok(packages)
    }
}

/// Turn an oracle reply into records, applying the retention invariant and
/// the never-empty fallback rule to both reply shapes.
fn structure_reply(reply: OracleReply) -> Vec<PackageRecord> {
    match reply {
        OracleReply::Packages(packages) => {
            let retained: Vec<PackageRecord> =
                packages.into_iter().filter(|p| p.qualifies()).collect();
            if retained.is_empty() {
                vec![PackageRecord::fallback("", None)]
            } else {
                retained
            }
        }
        OracleReply::Generated(text) => match extract(&text) {
            Ok(packages) => packages,
            Err(e) => {
                // Extraction faults are local and recoverable: surface the
                // diagnostic and raw input inside a fallback record.
                warn!(reason = %e.reason, "extraction fault, recovering with fallback record");
                vec![PackageRecord::fallback(&e.raw_text, None)]
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProvider;

    const LABELED: &str = "Hospital Name: Apollo\nPrice: \u{20b9}5000\n- Blood test\n- ECG";

    fn service_with(provider: MockProvider, widen: bool) -> PackageSearchService {
        PackageSearchService::with_provider(Box::new(provider), widen)
    }

    #[tokio::test]
    async fn test_search_structures_generated_text() {
        let service = service_with(MockProvider::with_text(LABELED), false);
        let packages = service.search_packages("full body checkup").await.unwrap();

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].hospital, "Apollo");
        assert_eq!(packages[0].price, "5000");
        assert_eq!(packages[0].features, vec!["Blood test", "ECG"]);
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_before_the_oracle() {
        let mock = MockProvider::with_text(LABELED);
        let service = service_with(mock, false);

        let err = service.search_packages("   ").await.unwrap_err();
        assert!(matches!(err, OracleError::InvalidQuery { .. }));
    }

    #[tokio::test]
    async fn test_query_is_enriched_before_sending() {
        let mock = MockProvider::with_text(LABELED);
        let handle = mock.clone();
        let service = service_with(mock, false);

        service.search_packages("renal screening").await.unwrap();

        let queries = handle.received_queries();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].starts_with("renal screening"));
        assert_ne!(queries[0], "renal screening");
    }

    #[tokio::test]
    async fn test_widened_requery_uses_widened_query_text() {
        let mock = MockProvider::with_replies(vec![
            Ok(OracleReply::Generated("nothing useful here".to_string())),
            Ok(OracleReply::Generated(LABELED.to_string())),
        ]);
        let handle = mock.clone();
        let service = service_with(mock, true);

        service.search_packages("checkup").await.unwrap();

        let queries = handle.received_queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1], widen("checkup"));
    }

    #[tokio::test]
    async fn test_widening_requeries_once_and_keeps_better_result() {
        let mock = MockProvider::with_replies(vec![
            Ok(OracleReply::Generated("nothing useful here".to_string())),
            Ok(OracleReply::Generated(LABELED.to_string())),
        ]);
        let service = service_with(mock, true);

        let packages = service.search_packages("checkup").await.unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].hospital, "Apollo");
    }

    #[tokio::test]
    async fn test_widening_failure_keeps_first_fallback_result() {
        let mock = MockProvider::with_replies(vec![
            Ok(OracleReply::Generated("nothing useful here".to_string())),
            Err(OracleError::Timeout { seconds: 30 }),
        ]);
        let service = service_with(mock, true);

        let packages = service.search_packages("checkup").await.unwrap();
        assert!(is_fallback_only(&packages));
        assert_eq!(packages[0].description, "nothing useful here");
    }

    #[tokio::test]
    async fn test_widening_disabled_sends_single_query() {
        let mock = MockProvider::with_replies(vec![Ok(OracleReply::Generated(
            "nothing useful here".to_string(),
        ))]);
        let service = service_with(mock, false);

        let packages = service.search_packages("checkup").await.unwrap();
        assert!(is_fallback_only(&packages));
    }

    #[tokio::test]
    async fn test_structured_pass_through_filters_placeholders() {
        let mut good = PackageRecord::placeholder();
        good.hospital = "Max".to_string();
        let reply = OracleReply::Packages(vec![PackageRecord::placeholder(), good.clone()]);

        let service = service_with(
            MockProvider::with_replies(vec![Ok(reply)]),
            false,
        );
        let packages = service.search_packages("checkup").await.unwrap();

        assert_eq!(packages, vec![good]);
    }

    #[tokio::test]
    async fn test_oracle_errors_propagate() {
        let mock =
            MockProvider::with_replies(vec![Err(OracleError::Unreachable {
                reason: "connection refused".to_string(),
            })]);
        let service = service_with(mock, false);

        let err = service.search_packages("checkup").await.unwrap_err();
        assert!(matches!(err, OracleError::Unreachable { .. }));
    }
}
