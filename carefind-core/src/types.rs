//! Data types for health-checkup package search results.

use serde::{Deserialize, Serialize};

/// Sentinel hospital name used when no provider could be determined.
pub const HOSPITAL_SENTINEL: &str = "Information Available";

/// Sentinel price used when no amount was found in the text.
pub const PRICE_SENTINEL: &str = "Contact for pricing";

/// Generic feature message carried by the fallback record.
pub const FALLBACK_FEATURE: &str =
    "Please contact the hospital for detailed package information";

/// One health-checkup offering extracted from generated free text.
///
/// Records are built transiently per request and never persisted.
/// Fields that could not be determined carry their sentinel values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageRecord {
    /// Provider name, or [`HOSPITAL_SENTINEL`].
    pub hospital: String,
    /// Package name or free-text summary; empty when absent.
    pub description: String,
    /// Included services/tests, in the order they appeared.
    pub features: Vec<String>,
    /// Numeric amount as found in the text, or [`PRICE_SENTINEL`].
    pub price: String,
}

impl PackageRecord {
    /// Create a record with every field at its sentinel/default value.
    pub fn placeholder() -> Self {
        Self {
            hospital: HOSPITAL_SENTINEL.to_string(),
            description: String::new(),
            features: Vec::new(),
            price: PRICE_SENTINEL.to_string(),
        }
    }

    /// Retention invariant: a record is kept only if at least one field
    /// differs from the placeholder defaults.
    pub fn qualifies(&self) -> bool {
        self.hospital != HOSPITAL_SENTINEL
            || !self.description.is_empty()
            || !self.features.is_empty()
            || self.price != PRICE_SENTINEL
    }

    /// Build the single guaranteed record emitted when extraction found
    /// nothing usable: the whole raw text becomes the description.
    pub fn fallback(raw_text: &str, hospital_hint: Option<String>) -> Self {
        Self {
            hospital: hospital_hint.unwrap_or_else(|| HOSPITAL_SENTINEL.to_string()),
            description: raw_text.to_string(),
            features: vec![FALLBACK_FEATURE.to_string()],
            price: PRICE_SENTINEL.to_string(),
        }
    }
}

impl Default for PackageRecord {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Whether an output list is exactly the fallback singleton.
///
/// Drives the one-shot widened re-query: a fallback-only result means the
/// oracle produced prose the extractor could not structure.
pub fn is_fallback_only(packages: &[PackageRecord]) -> bool {
    match packages {
        [only] => {
            only.features.len() == 1
                && only.features[0] == FALLBACK_FEATURE
                && only.price == PRICE_SENTINEL
        }
        _ => false,
    }
}
