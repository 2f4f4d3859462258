//! Version extraction and comparison.
//!
//! Release entry titles normally embed a Chromium-style dotted-quad version
//! (`119.0.6045.123`). When a title carries no such pattern the trimmed title
//! itself stands in as the version string; the comparison then reports an
//! update rather than failing the check.

use regex::Regex;
use std::sync::LazyLock;

/// Four integer groups separated by periods, e.g. `119.0.6045.123`.
static DOTTED_QUAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+\.\d+").expect("regex: dotted quad"));

/// Extracts the version string from a release entry title.
///
/// Returns the first dotted-quad substring verbatim (no re-formatting, no
/// leading-zero stripping). Titles without one yield the trimmed title as a
/// degraded fallback rather than an error.
pub fn extract_version(title: &str) -> String {
    match DOTTED_QUAD.find(title) {
        Some(m) => m.as_str().to_string(),
        None => title.trim().to_string(),
    }
}

/// Whether the locally detected version matches the latest released one.
///
/// Exact string equality. No semantic-version ordering, no normalisation;
/// differently formatted but numerically equal versions compare as outdated.
pub fn is_up_to_date(local: &str, latest: &str) -> bool {
    local == latest
}
