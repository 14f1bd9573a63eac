//! Service-level flow: enrichment, extraction, widening, error surfaces.

use carefind_core::is_fallback_only;
use carefind_search::{OracleError, OracleReply, PackageSearchService};

use crate::support::{LABELED_ANSWER, ScriptedOracle};

#[tokio::test]
async fn labeled_answer_flows_into_structured_records() {
    let oracle = ScriptedOracle::answering(LABELED_ANSWER);
    let service = PackageSearchService::with_provider(Box::new(oracle), false);

    let packages = service
        .search_packages("full body checkup")
        .await
        .expect("search should succeed");

    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].hospital, "Apollo Hospitals");
    assert_eq!(packages[0].price, "4999");
    assert_eq!(packages[0].description, "Annual full-body screening");
    assert_eq!(
        packages[0].features,
        vec!["Complete blood count", "ECG", "Lipid profile"]
    );
}

#[tokio::test]
async fn enrichment_is_applied_to_the_outbound_query() {
    let oracle = ScriptedOracle::answering(LABELED_ANSWER);
    let handle = oracle.clone();
    let service = PackageSearchService::with_provider(Box::new(oracle), false);

    service.search_packages("diabetes screening").await.unwrap();

    let queries = handle.received_queries();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].starts_with("diabetes screening"));
    assert!(queries[0].len() > "diabetes screening".len());
}

#[tokio::test]
async fn unstructured_prose_becomes_a_single_fallback_record() {
    let oracle = ScriptedOracle::answering("I could not find any matching packages.");
    let service = PackageSearchService::with_provider(Box::new(oracle), false);

    let packages = service.search_packages("checkup").await.unwrap();

    assert!(is_fallback_only(&packages));
    assert_eq!(
        packages[0].description,
        "I could not find any matching packages."
    );
}

#[tokio::test]
async fn fallback_triggers_exactly_one_widened_requery() {
    let labeled = LABELED_ANSWER.to_string();
    let oracle = ScriptedOracle::scripted(vec![
        Box::new(|| Ok(OracleReply::Generated("nothing useful".to_string()))),
        Box::new(move || Ok(OracleReply::Generated(labeled.clone()))),
    ]);
    let handle = oracle.clone();
    let service = PackageSearchService::with_provider(Box::new(oracle), true);

    let packages = service.search_packages("checkup").await.unwrap();

    assert_eq!(handle.received_queries().len(), 2);
    assert_eq!(packages[0].hospital, "Apollo Hospitals");
}

#[tokio::test]
async fn widening_never_loops_when_requery_also_falls_back() {
    let oracle = ScriptedOracle::answering("still nothing useful");
    let handle = oracle.clone();
    let service = PackageSearchService::with_provider(Box::new(oracle), true);

    let packages = service.search_packages("checkup").await.unwrap();

    // One original query plus exactly one widening, never more.
    assert_eq!(handle.received_queries().len(), 2);
    assert!(is_fallback_only(&packages));
}

#[tokio::test]
async fn structured_pass_through_skips_extraction() {
    let oracle = ScriptedOracle::scripted(vec![Box::new(|| {
        let packages = serde_json::from_value(serde_json::json!([{
            "hospital": "Fortis Healthcare",
            "description": "Cardiac screen",
            "features": ["Echo", "Treadmill test"],
            "price": "7500"
        }]))
        .unwrap();
        Ok(OracleReply::Packages(packages))
    })]);
    let service = PackageSearchService::with_provider(Box::new(oracle), false);

    let packages = service.search_packages("cardiac checkup").await.unwrap();

    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].hospital, "Fortis Healthcare");
    assert_eq!(packages[0].features.len(), 2);
}

#[tokio::test]
async fn timeout_and_connection_failures_stay_distinct() {
    let timeout_service =
        PackageSearchService::with_provider(Box::new(ScriptedOracle::timing_out()), false);
    let unreachable_service =
        PackageSearchService::with_provider(Box::new(ScriptedOracle::unreachable()), false);

    let timeout = timeout_service.search_packages("checkup").await.unwrap_err();
    let unreachable = unreachable_service
        .search_packages("checkup")
        .await
        .unwrap_err();

    assert!(matches!(timeout, OracleError::Timeout { .. }));
    assert!(matches!(unreachable, OracleError::Unreachable { .. }));
}
