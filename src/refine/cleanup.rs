//! Defensive cleanup of the generation service's returned text.
//!
//! The service is instructed to answer with raw Markdown starting at the
//! document marker line, but models occasionally wrap the answer in a code
//! fence or prepend chatty preamble anyway. Cleanup strips both; it must
//! never alter well-formed output.

use once_cell::sync::Lazy;
use regex::Regex;

/// The leading marker line every refined document must begin with.
pub const SOUL_MARKER: &str = "# SOUL DEFINITION";

static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_-]*\r?\n?").expect("fence-open regex"));
static FENCE_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n?```\s*$").expect("fence-close regex"));

/// Strip a wrapping code fence and any preamble before the marker line.
pub fn clean_refined_output(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_open = FENCE_OPEN.replace(trimmed, "");
    let without_fences = FENCE_CLOSE.replace(&without_open, "");
    let cleaned = without_fences.trim();

    // Anything before the marker is model preamble; drop it.
    match cleaned.find(SOUL_MARKER) {
        Some(index) if index > 0 => cleaned[index..].trim().to_string(),
        _ => cleaned.to_string(),
    }
}
