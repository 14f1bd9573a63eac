//! Shared scaffolding for integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use carefind_search::{OracleError, OracleProvider, OracleReply};

/// Scripted oracle replaying queued outcomes in order.
///
/// Outcomes are produced by closures so error variants (which are not
/// `Clone`) can be queued alongside replies.
#[derive(Clone)]
pub struct ScriptedOracle {
    script: Arc<Mutex<Vec<Outcome>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

/// One scripted provider outcome; a closure so error variants (not `Clone`)
/// can be queued.
pub type Outcome = Box<dyn Fn() -> Result<OracleReply, OracleError> + Send + Sync>;

impl std::fmt::Debug for ScriptedOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedOracle").finish_non_exhaustive()
    }
}

impl ScriptedOracle {
    /// Oracle that always answers with the given generated text.
    pub fn answering(text: &str) -> Self {
        let text = text.to_string();
        Self::scripted(vec![Box::new(move || {
            Ok(OracleReply::Generated(text.clone()))
        })])
    }

    /// Oracle that always times out.
    pub fn timing_out() -> Self {
        Self::scripted(vec![Box::new(|| {
            Err(OracleError::Timeout { seconds: 30 })
        })])
    }

    /// Oracle that always fails to connect.
    pub fn unreachable() -> Self {
        Self::scripted(vec![Box::new(|| {
            Err(OracleError::Unreachable {
                reason: "connection refused".to_string(),
            })
        })])
    }

    /// Oracle replaying the given outcomes in order, repeating the last.
    pub fn scripted(mut script: Vec<Outcome>) -> Self {
        script.reverse();
        Self {
            script: Arc::new(Mutex::new(script)),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queries received so far, in order.
    pub fn received_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl OracleProvider for ScriptedOracle {
    async fn retrieve_and_generate(&self, query: &str) -> Result<OracleReply, OracleError> {
        self.queries.lock().unwrap().push(query.to_string());

        let mut script = self.script.lock().unwrap();
        let outcome = if script.len() > 1 {
            script.pop().unwrap()
        } else {
            return match script.last() {
                Some(outcome) => outcome(),
                None => Ok(OracleReply::Generated(String::new())),
            };
        };
        outcome()
    }
}

/// A well-formed labeled oracle answer used across tests.
pub const LABELED_ANSWER: &str = "Hospital Name: Apollo Hospitals\n\
Package Name: Comprehensive Health Check\n\
Price: \u{20b9}4999\n\
Description: Annual full-body screening\n\
- Complete blood count\n\
- ECG\n\
- Lipid profile";
