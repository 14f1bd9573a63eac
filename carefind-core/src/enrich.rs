//! Query enrichment for the generation oracle.
//!
//! Appends clarifying instructions to a raw user query based on keyword
//! presence, so the oracle is nudged toward a parseable, price-annotated
//! listing. Pure string logic, no failure modes.

/// Keywords indicating the user already asked about a specific provider.
const HOSPITAL_KEYWORDS: &[&str] = &["hospital"];

/// Keywords indicating the user already asked about pricing.
const PRICE_KEYWORDS: &[&str] = &["budget", "price", "cost"];

/// Keywords indicating the query is already scoped to providers.
const PROVIDER_KEYWORDS: &[&str] = &["hospital", "clinic"];

const LISTING_SUFFIX: &str =
    "Please list all available health checkup packages with their prices.";
const PRICING_SUFFIX: &str = "Please include package prices.";
const COMPARE_SUFFIX: &str = "Please compare packages across different hospitals.";

fn contains_any(query_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| query_lower.contains(k))
}

/// Append clarifying instruction suffixes to a raw query.
///
/// A query mentioning "hospital" without any price keyword gets a full
/// package/price-listing instruction. Otherwise a pricing instruction is
/// added when no price keyword is present, and a provider-comparison
/// instruction when no provider keyword is present. A query that already
/// carries both price and hospital keywords passes through unchanged, so
/// enrichment never stacks duplicate suffixes.
pub fn enrich(query: &str) -> String {
    let query = query.trim();
    let lower = query.to_lowercase();
    let mut enriched = query.to_string();

    if contains_any(&lower, HOSPITAL_KEYWORDS) {
        if !contains_any(&lower, PRICE_KEYWORDS) {
            enriched.push(' ');
            enriched.push_str(LISTING_SUFFIX);
        }
        return enriched;
    }

    if !contains_any(&lower, PRICE_KEYWORDS) {
        enriched.push(' ');
        enriched.push_str(PRICING_SUFFIX);
    }

    if !contains_any(&lower, PROVIDER_KEYWORDS) {
        enriched.push(' ');
        enriched.push_str(COMPARE_SUFFIX);
    }

    enriched
}

/// One-shot widened re-query used when the first extraction produced only
/// the fallback record. Broadens the ask instead of retrying verbatim.
pub fn widen(query: &str) -> String {
    format!(
        "List all available health checkup packages related to: {}. \
         For each package include the hospital name, package name, price and included tests.",
        query.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hospital_query_gets_listing_suffix() {
        let enriched = enrich("packages at Apollo hospital");
        assert!(enriched.starts_with("packages at Apollo hospital"));
        assert!(enriched.ends_with(LISTING_SUFFIX));
        // The listing suffix is exclusive of the other two.
        assert!(!enriched.contains(PRICING_SUFFIX));
        assert!(!enriched.contains(COMPARE_SUFFIX));
    }

    #[test]
    fn test_bare_query_gets_pricing_and_comparison() {
        let enriched = enrich("full body checkup for seniors");
        assert!(enriched.contains(PRICING_SUFFIX));
        assert!(enriched.contains(COMPARE_SUFFIX));
    }

    #[test]
    fn test_priced_clinic_query_is_unchanged() {
        let query = "clinic checkup under 5000 budget";
        assert_eq!(enrich(query), query);
    }

    #[test]
    fn test_enrich_is_case_insensitive() {
        let enriched = enrich("Checkups at Fortis HOSPITAL");
        assert!(enriched.ends_with(LISTING_SUFFIX));
    }

    #[test]
    fn test_enrich_is_idempotent_for_saturated_queries() {
        // "price" and "hospital" both present: nothing to add.
        let query = "hospital checkup price list";
        assert_eq!(enrich(query), query);
        assert_eq!(enrich(&enrich(query)), query);
    }

    #[test]
    fn test_enrich_reaches_fixpoint_after_one_pass() {
        // Every suffix introduces the keywords its branch checks for, so a
        // second pass leaves the enriched query alone.
        for query in ["hospital packages", "full body checkup", "clinic tests"] {
            let once = enrich(query);
            assert_eq!(enrich(&once), once);
        }
    }

    #[test]
    fn test_widen_carries_original_query() {
        let widened = widen("diabetes screening");
        assert!(widened.contains("diabetes screening"));
        assert!(widened.to_lowercase().contains("price"));
    }
}
