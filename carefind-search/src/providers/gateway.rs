//! HTTP gateway provider for production oracle access.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, warn};

use carefind_core::{OracleConfig, PackageRecord};

use super::{OracleProvider, OracleReply};
use crate::Result;
use crate::errors::OracleError;

/// Production oracle provider speaking JSON to a managed gateway endpoint.
///
/// Owns its HTTP client, constructed once with the configured timeout; the
/// provider is injected into the search service rather than living as
/// process-global state. Performs no automatic retries.
#[derive(Debug)]
pub struct GatewayProvider {
    client: reqwest::Client,
    config: OracleConfig,
}

impl GatewayProvider {
    /// Build a provider with an HTTP client carrying the configured timeout.
    ///
    /// # Errors
    /// - `OracleError::Unreachable` - the HTTP client could not be constructed
    pub fn new(config: OracleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| OracleError::Unreachable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    /// Classify a decoded 2xx response body into a reply.
    fn classify_body(&self, status: u16, body: Value) -> Result<OracleReply> {
        if let Some(packages) = body.get("packages") {
            let packages: Vec<PackageRecord> = serde_json::from_value(packages.clone())
                .map_err(|e| OracleError::MalformedResponse {
                    reason: format!("packages field did not decode: {e}"),
                })?;
            return Ok(OracleReply::Packages(packages));
        }

        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(OracleError::UpstreamFailure {
                status,
                message: message.to_string(),
            });
        }

        if let Some(text) = generated_text(&body) {
            return Ok(OracleReply::Generated(text.to_string()));
        }

        Err(OracleError::MalformedResponse {
            reason: "response carried neither packages nor generated text".to_string(),
        })
    }
}

/// Locate the generated-text field in an oracle-native response body.
fn generated_text(body: &Value) -> Option<&str> {
    body.pointer("/output/text")
        .or_else(|| body.get("text"))
        .and_then(Value::as_str)
}

/// Best-effort message extraction from a non-2xx error body.
fn upstream_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| format!("oracle request failed with status {status}"))
}

#[async_trait]
impl OracleProvider for GatewayProvider {
    async fn retrieve_and_generate(&self, query: &str) -> Result<OracleReply> {
        let payload = json!({
            "query": query,
            "knowledgeBaseId": self.config.knowledge_base_id,
            "region": self.config.region,
        });

        debug!(endpoint = %self.config.endpoint_url, "sending oracle request");

        let response = self
            .client
            .post(&self.config.endpoint_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout {
                        seconds: self.config.request_timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    OracleError::Unreachable {
                        reason: e.to_string(),
                    }
                } else {
                    OracleError::Unreachable {
                        reason: format!("oracle request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(OracleError::EndpointNotFound {
                url: self.config.endpoint_url.clone(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "oracle returned error status");
            return Err(OracleError::UpstreamFailure {
                status: status.as_u16(),
                message: upstream_message(status.as_u16(), &body),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse {
                reason: format!("response body was not valid JSON: {e}"),
            })?;

        self.classify_body(status.as_u16(), body)
    }
}
