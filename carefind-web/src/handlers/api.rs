//! JSON API handlers for package search and health.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{Value, json};
use tracing::{debug, error};

use carefind_search::OracleError;

use crate::server::AppState;

/// Search for health-checkup packages.
///
/// Accepts a JSON body in either caller shape: `{"query": "..."}` or
/// `{"body": {"query": "..."}}`. Responds `{"packages": [...]}` on
/// success and `{"error": "..."}` with a matching status otherwise. No
/// error here ever terminates the process.
pub async fn api_search(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    debug!(?body, "search request received");

    let Some(query) = extract_query(&body) else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Query is required",
        ));
    };

    match state.search_service.search_packages(&query).await {
        Ok(packages) => Ok(Json(json!({ "packages": packages }))),
        Err(e) => {
            error!(error = %e, "search failed");
            Err(oracle_error_response(&e))
        }
    }
}

/// Liveness endpoint reporting uptime.
pub async fn api_health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_seconds": state.server_started_at.elapsed().as_secs(),
    }))
}

/// Pull the query string out of either supported caller shape.
///
/// Returns `None` for a missing or blank query.
pub fn extract_query(body: &Value) -> Option<String> {
    let query = body
        .get("query")
        .or_else(|| body.pointer("/body/query"))
        .and_then(Value::as_str)?
        .trim();

    (!query.is_empty()).then(|| query.to_string())
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

/// Map the oracle error taxonomy onto HTTP statuses and user-facing bodies.
fn oracle_error_response(err: &OracleError) -> (StatusCode, Json<Value>) {
    match err {
        OracleError::InvalidQuery { .. } => {
            error_response(StatusCode::BAD_REQUEST, "Query is required")
        }
        OracleError::Timeout { .. } => error_response(
            StatusCode::GATEWAY_TIMEOUT,
            "The search took too long to answer. Please try again.",
        ),
        OracleError::Unreachable { .. } => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Failed to connect to the search backend. Please check your connection and try again.",
        ),
        OracleError::EndpointNotFound { url } => error_response(
            StatusCode::NOT_FOUND,
            &format!("Search endpoint not found. Please check the gateway configuration. URL: {url}"),
        ),
        OracleError::UpstreamFailure { status, message } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            // 2xx "failures" happen when the oracle embeds an error in a
            // successful body; surface those as a bad gateway.
            let status = if status.is_success() {
                StatusCode::BAD_GATEWAY
            } else {
                status
            };
            error_response(status, message)
        }
        OracleError::MalformedResponse { .. } => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "The search backend returned an unexpected response format.",
        ),
    }
}
