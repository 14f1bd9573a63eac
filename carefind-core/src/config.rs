//! Centralized configuration for CareFind.
//!
//! All tunable parameters live here. Oracle settings come from the
//! environment and are validated before first use: a missing required
//! variable is a startup-time fatal condition for the component that
//! needs it.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable holding the oracle gateway endpoint URL.
pub const ENV_API_URL: &str = "CAREFIND_API_URL";
/// Environment variable holding the knowledge-base identifier.
pub const ENV_KB_ID: &str = "CAREFIND_KB_ID";
/// Environment variable holding the oracle region identifier.
pub const ENV_REGION: &str = "CAREFIND_REGION";
/// Optional environment variable overriding the request timeout (seconds).
pub const ENV_TIMEOUT_SECS: &str = "CAREFIND_TIMEOUT_SECS";
/// Optional environment variable toggling the one-shot widened re-query.
pub const ENV_WIDEN_ON_FALLBACK: &str = "CAREFIND_WIDEN_ON_FALLBACK";

/// Upper bound for the outbound request timeout.
const MAX_TIMEOUT_SECS: u64 = 120;
/// Default outbound request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors raised while loading oracle settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("Required environment variable {name} is not set")]
    MissingVar {
        /// Name of the missing variable.
        name: &'static str,
    },

    /// An environment variable is present but unusable.
    #[error("Environment variable {name} is invalid: {reason}")]
    InvalidVar {
        /// Name of the offending variable.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Connection settings for the external generation oracle.
///
/// Constructed once at startup and handed to the gateway provider; the
/// provider owns the HTTP client built from these settings.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Gateway endpoint receiving `{"query": ...}` POST bodies.
    pub endpoint_url: String,
    /// Knowledge-base identifier forwarded with every request.
    pub knowledge_base_id: String,
    /// Region identifier forwarded with every request.
    pub region: String,
    /// Outbound request timeout, bounded to [1, 120] seconds.
    pub request_timeout: Duration,
    /// Whether a fallback-only result triggers one widened re-query.
    pub widen_on_fallback: bool,
}

impl OracleConfig {
    /// Load oracle settings from the environment.
    ///
    /// # Errors
    /// - `ConfigError::MissingVar` - a required variable is unset or empty
    /// - `ConfigError::InvalidVar` - the endpoint URL or timeout is unusable
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint_url = require_var(ENV_API_URL)?;
        Url::parse(&endpoint_url).map_err(|e| ConfigError::InvalidVar {
            name: ENV_API_URL,
            reason: e.to_string(),
        })?;

        let knowledge_base_id = require_var(ENV_KB_ID)?;
        let region = require_var(ENV_REGION)?;

        let timeout_secs = match std::env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidVar {
                    name: ENV_TIMEOUT_SECS,
                    reason: format!("'{raw}' is not a number of seconds"),
                })?;
                if secs == 0 || secs > MAX_TIMEOUT_SECS {
                    return Err(ConfigError::InvalidVar {
                        name: ENV_TIMEOUT_SECS,
                        reason: format!("must be between 1 and {MAX_TIMEOUT_SECS} seconds"),
                    });
                }
                secs
            }
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let widen_on_fallback = std::env::var(ENV_WIDEN_ON_FALLBACK)
            .map(|raw| raw.parse().unwrap_or(true))
            .unwrap_or(true);

        Ok(Self {
            endpoint_url,
            knowledge_base_id,
            region,
            request_timeout: Duration::from_secs(timeout_secs),
            widen_on_fallback,
        })
    }

    /// Configuration pointed at a local test endpoint.
    pub fn for_testing(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            knowledge_base_id: "test-kb".to_string(),
            region: "test-region".to_string(),
            request_timeout: Duration::from_secs(5),
            widen_on_fallback: true,
        }
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar { name }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, PoisonError};

    use super::*;

    // Tests touching the oracle env vars mutate shared process state and
    // must not interleave; each one holds this lock for its full body.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn set_required_vars() {
        unsafe {
            std::env::set_var(ENV_API_URL, "http://localhost:9999/generate");
            std::env::set_var(ENV_KB_ID, "kb-test");
            std::env::set_var(ENV_REGION, "local");
        }
    }

    fn clear_oracle_vars() {
        unsafe {
            std::env::remove_var(ENV_API_URL);
            std::env::remove_var(ENV_KB_ID);
            std::env::remove_var(ENV_REGION);
            std::env::remove_var(ENV_TIMEOUT_SECS);
            std::env::remove_var(ENV_WIDEN_ON_FALLBACK);
        }
    }

    #[test]
    fn test_for_testing_defaults() {
        let config = OracleConfig::for_testing("http://localhost:9999/generate");
        assert_eq!(config.endpoint_url, "http://localhost:9999/generate");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.widen_on_fallback);
    }

    #[test]
    fn test_from_env_requires_all_variables() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_oracle_vars();

        let err = OracleConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { name: ENV_API_URL }));
    }

    #[test]
    fn test_timeout_defaults_to_thirty_seconds() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        set_required_vars();
        unsafe {
            std::env::remove_var(ENV_TIMEOUT_SECS);
        }

        let config = OracleConfig::from_env().unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        clear_oracle_vars();
    }

    #[test]
    fn test_timeout_honors_in_range_override() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        set_required_vars();
        unsafe {
            std::env::set_var(ENV_TIMEOUT_SECS, "60");
        }

        let config = OracleConfig::from_env().unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(60));

        clear_oracle_vars();
    }

    #[test]
    fn test_timeout_rejects_non_numeric_values() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        set_required_vars();
        unsafe {
            std::env::set_var(ENV_TIMEOUT_SECS, "soon");
        }

        let err = OracleConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                name: ENV_TIMEOUT_SECS,
                ..
            }
        ));

        clear_oracle_vars();
    }

    #[test]
    fn test_timeout_rejects_out_of_bounds_values() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        set_required_vars();

        for raw in ["0", "121"] {
            unsafe {
                std::env::set_var(ENV_TIMEOUT_SECS, raw);
            }
            let err = OracleConfig::from_env().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidVar {
                    name: ENV_TIMEOUT_SECS,
                    ..
                }
            ));
        }

        clear_oracle_vars();
    }

    #[test]
    fn test_require_var_rejects_blank_values() {
        unsafe {
            std::env::set_var("CAREFIND_TEST_BLANK", "   ");
        }
        assert!(require_var("CAREFIND_TEST_BLANK").is_err());
        unsafe {
            std::env::remove_var("CAREFIND_TEST_BLANK");
        }
    }
}
