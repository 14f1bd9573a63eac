//! Label-driven extraction of package records from generated prose.
//!
//! The oracle is prompted to answer in a loosely line-labeled layout
//! (`Hospital Name:`, `Package Name:`, `Price:`, `Description:` plus
//! bulleted features). This module scans that text line by line and
//! accumulates records, falling back to a single catch-all record when
//! nothing recognizable was found. The output list is never empty.
//!
//! Precedence rules: a `Hospital Name:` or `Package Name:` line closes any
//! in-progress record and opens a new one; `Package Name:` seeds the
//! description and a later `Description:` line overwrites it (last label
//! wins); bullet lines accumulate features in order.

use thiserror::Error;
use tracing::debug;

use crate::types::PackageRecord;

/// Labels that open a new record when encountered.
const RECORD_OPENERS: &[&str] = &["Hospital Name:", "Package Name:"];

/// Bullet markers recognized as feature lines.
const BULLET_MARKERS: &[&str] = &["- ", "* ", "\u{2022} "];

/// Keywords used for the best-effort hospital hint on the fallback path.
const HOSPITAL_HINTS: &[&str] = &["hospital", "medical center", "clinic", "healthcare"];

/// Currency symbol stripped from price lines.
const RUPEE: char = '\u{20b9}';

/// Inputs beyond this size are treated as an internal fault rather than
/// scanned; well-formed oracle answers are a few kilobytes.
const MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Internal fault while structuring generated text.
///
/// Carries the diagnostic plus the (truncated) raw input for debugging.
/// Callers recover from this locally with a fallback record; it never
/// crosses the request boundary as a hard failure.
#[derive(Debug, Error)]
#[error("Failed to structure generated text: {reason}")]
pub struct ExtractionError {
    /// What went wrong.
    pub reason: String,
    /// The offending input, truncated to a loggable size.
    pub raw_text: String,
}

/// Extract an ordered list of package records from generated text.
///
/// Applies the label-driven policy described at module level. When no line
/// matched any label, returns exactly one fallback record carrying the
/// whole input as its description, so the result is never empty.
///
/// # Errors
/// - `ExtractionError` - input exceeded the sanity size bound
pub fn extract(raw_text: &str) -> Result<Vec<PackageRecord>, ExtractionError> {
    if raw_text.len() > MAX_INPUT_BYTES {
        return Err(ExtractionError {
            reason: format!(
                "generated text of {} bytes exceeds the {MAX_INPUT_BYTES} byte bound",
                raw_text.len()
            ),
            raw_text: raw_text.chars().take(1024).collect(),
        });
    }

    let mut packages = Vec::new();
    let mut current: Option<PackageRecord> = None;

    for line in raw_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if RECORD_OPENERS.iter().any(|label| line.starts_with(label)) {
            close_record(&mut packages, current.take());
            current = Some(PackageRecord::placeholder());
        }

        let Some(record) = current.as_mut() else {
            continue;
        };

        if let Some(value) = strip_label(line, "Hospital Name:") {
            record.hospital = value.to_string();
        } else if let Some(value) = strip_label(line, "Package Name:") {
            record.description = value.to_string();
        } else if let Some(value) = strip_label(line, "Price:") {
            record.price = parse_price(value);
        } else if let Some(value) = strip_label(line, "Description:") {
            record.description = value.to_string();
        } else if let Some(feature) = strip_bullet(line) {
            record.features.push(feature.to_string());
        }
    }

    close_record(&mut packages, current.take());

    if packages.is_empty() {
        debug!("no labeled records found, emitting fallback record");
        packages.push(PackageRecord::fallback(raw_text, hospital_hint(raw_text)));
    }

    Ok(packages)
}

/// Append a finished record if it passes the retention invariant.
fn close_record(packages: &mut Vec<PackageRecord>, record: Option<PackageRecord>) {
    if let Some(record) = record {
        if record.qualifies() {
            packages.push(record);
        }
    }
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.strip_prefix(label).map(str::trim)
}

fn strip_bullet(line: &str) -> Option<&str> {
    BULLET_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
        .filter(|feature| !feature.is_empty())
}

/// Keep only the amount after the last currency symbol, if one is present.
fn parse_price(value: &str) -> String {
    match value.rfind(RUPEE) {
        Some(pos) => value[pos + RUPEE.len_utf8()..].trim().to_string(),
        None => value.to_string(),
    }
}

/// Best-effort provider hint for the fallback record: the first line that
/// mentions a hospital-like keyword.
fn hospital_hint(raw_text: &str) -> Option<String> {
    raw_text.lines().map(str::trim).find_map(|line| {
        let lower = line.to_lowercase();
        HOSPITAL_HINTS
            .iter()
            .any(|hint| lower.contains(hint))
            .then(|| line.to_string())
    })
}
