//! Template rendering — named placeholder substitution.
//!
//! Substitution is exactly-once per placeholder (first occurrence only).
//! Configuration validation guarantees each placeholder appears exactly
//! once, so first-occurrence semantics and whole-template semantics
//! coincide for valid config.

use crate::config::{ARCHETYPES_PLACEHOLDER, POLICIES_PLACEHOLDER, TONE_PLACEHOLDER};

/// Substitute the three placeholders in a locale-selected template.
///
/// The two line-list blocks get a leading newline so they start on their
/// own line below whatever precedes the placeholder; the tone summary is a
/// single inline value.
pub fn render(
    template: &str,
    archetype_lines: &[String],
    tone_summary: &str,
    policy_lines: &[String],
) -> String {
    let archetype_block = format!("\n{}", archetype_lines.join("\n"));
    let policy_block = format!("\n{}", policy_lines.join("\n"));

    template
        .replacen(ARCHETYPES_PLACEHOLDER, &archetype_block, 1)
        .replacen(TONE_PLACEHOLDER, tone_summary, 1)
        .replacen(POLICIES_PLACEHOLDER, &policy_block, 1)
}
