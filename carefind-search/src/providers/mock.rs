//! Scripted mock provider for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{OracleProvider, OracleReply};
use crate::Result;
use crate::errors::OracleError;

/// Mock provider replaying queued replies in order and recording the
/// queries it received. Once the queue is exhausted it repeats the last
/// reply. Clones share state, so a handle kept outside the service can
/// inspect the queries the service sent.
#[derive(Debug, Clone)]
pub struct MockProvider {
    replies: Arc<Mutex<Vec<Result<OracleReply>>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Mock that always answers with the given generated text.
    pub fn with_text(text: &str) -> Self {
        Self::with_replies(vec![Ok(OracleReply::Generated(text.to_string()))])
    }

    /// Mock replaying the given replies in order.
    pub fn with_replies(mut replies: Vec<Result<OracleReply>>) -> Self {
        replies.reverse(); // pop() from the back yields original order
        Self {
            replies: Arc::new(Mutex::new(replies)),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queries received so far, in order.
    pub fn received_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl OracleProvider for MockProvider {
    async fn retrieve_and_generate(&self, query: &str) -> Result<OracleReply> {
        self.queries.lock().unwrap().push(query.to_string());

        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop()
        } else {
            replies.last().map(|r| match r {
                Ok(reply) => Ok(reply.clone()),
                Err(err) => Err(clone_error(err)),
            })
        };

        reply.unwrap_or_else(|| Ok(OracleReply::Generated(String::new())))
    }
}

// OracleError intentionally does not implement Clone; rebuild the variants
// the mock needs to replay.
fn clone_error(err: &OracleError) -> OracleError {
    match err {
        OracleError::InvalidQuery { reason } => OracleError::InvalidQuery {
            reason: reason.clone(),
        },
        OracleError::Timeout { seconds } => OracleError::Timeout { seconds: *seconds },
        OracleError::Unreachable { reason } => OracleError::Unreachable {
            reason: reason.clone(),
        },
        OracleError::EndpointNotFound { url } => OracleError::EndpointNotFound {
            url: url.clone(),
        },
        OracleError::UpstreamFailure { status, message } => OracleError::UpstreamFailure {
            status: *status,
            message: message.clone(),
        },
        OracleError::MalformedResponse { reason } => OracleError::MalformedResponse {
            reason: reason.clone(),
        },
    }
}
