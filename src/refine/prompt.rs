//! Refinement instruction payload.
//!
//! Serializes the deterministic draft, the tone settings, and the signed
//! coordinate set into one natural-language prompt with strict output-format
//! rules, for the external generation service to rewrite into a richer,
//! instruction-formatted persona document.

use std::fmt::Write as _;

use crate::engine::normalize;
use crate::refine::cleanup::SOUL_MARKER;
use crate::types::{CoordinateMap, Locale, ToneSettings};

/// The five fixed subsections a refined document must contain, in order.
pub const OUTPUT_SECTIONS: [&str; 5] = [
    "1. Identity",
    "2. Core Drive & Cognition",
    "3. Linguistic Style & Tone",
    "4. Behavioral Examples",
    "5. Unconscious Patterns",
];

/// Render the tone settings as bullet lines for the prompt.
fn tone_context(tone: &ToneSettings) -> String {
    match tone {
        ToneSettings::Detailed {
            tone,
            amount,
            use_emoji,
            additional,
        } => {
            let mut out = String::new();
            let _ = writeln!(out, "- **Conversational tone:** {tone}");
            let _ = writeln!(out, "- **Conversation volume:** {amount}");
            let _ = writeln!(
                out,
                "- **Emoji usage:** {}",
                if *use_emoji { "use actively" } else { "never use" }
            );
            if let Some(extra) = additional {
                if !extra.trim().is_empty() {
                    let _ = writeln!(out, "- **Additional preferences:** {extra}");
                }
            }
            out.trim_end().to_string()
        }
        ToneSettings::Simple { .. } => {
            format!("- **Conversational tone:** {}", tone.summary(Locale::En))
        }
    }
}

/// Render the coordinate map as signed display values, one line per matrix.
fn coordinate_context(coordinates: &CoordinateMap) -> String {
    coordinates
        .iter()
        .map(|(id, coord)| {
            let display = normalize(*coord);
            format!("- {}: x={}, y={}", id, display.x, display.y)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the single instruction payload for the generation service.
pub fn build_refinement_prompt(
    draft: &str,
    tone: &ToneSettings,
    coordinates: &CoordinateMap,
    locale: Locale,
) -> String {
    let output_language = match locale {
        Locale::En => "English",
        Locale::Ja => "Japanese",
    };

    format!(
        r#"You are a **Soul Architect**.
Analyze the user's parameters and produce **a system prompt (soul.md) that makes an LLM behave as this person**.

This is not a psychological report. The output will be loaded directly into an LLM as an executable behavior definition, so write every section as a direct instruction to the LLM ("You are...", "You always...", "Do...").

### Input parameters

**Tone settings:**
{tone_context}

**Personality matrix coordinates:**
{coordinate_context}
(center=0, left=-100, right=100, up=-100, down=100; absolute values above 50 mark a very pronounced trait)

**Draft (baseline):**
```
{draft}
```

### Generation rules
1. **Hide the coordinates completely.** Never include raw coordinate values or meta commentary ("because the x axis is high...") in the output. Use the numbers for analysis only and condense them into natural behavioral instructions.
2. **No emoji inside the output document.** Treat the emoji setting only as a written rule inside the Linguistic Style section (e.g. "Use emoji freely.").
3. **Write in the imperative.** Each section is a direct instruction to the LLM, never an analytical observation.

### Output format (strict)

Reproduce this structure exactly; do not alter section numbers or headings.

```
{marker}: [a short title condensing the essence of this persona]

## {section_identity}
[one-sentence core identity the LLM adopts as its self-image]

## {section_cognition}
[thought patterns, decision making, and value judgments written as behavioral instructions, in several paragraphs]

## {section_style}
[concrete speech-style rules as a bullet list: tone, vocabulary, verbal tics, sentence length, conversation volume, emoji rules]

## {section_examples}
[several concrete situations with example responses in this persona's voice; no emoji, note emoji behavior in words instead]

## {section_patterns}
[unconscious habits, thinking quirks, and fixations that make the persona feel natural]
```

**Hard requirements:**
- **Start the output directly at `{marker}:`.** No introduction, greeting, or meta commentary of any kind.
- **Do not wrap the output in a code block.** Emit raw Markdown.
- **Do not add sections beyond the five above.**
- Write the output in **{output_language}**.
- **No closing remarks.** End with the last section.
- A model that reads this definition must be able to start responding as this person immediately."#,
        tone_context = tone_context(tone),
        coordinate_context = coordinate_context(coordinates),
        draft = draft,
        marker = SOUL_MARKER,
        section_identity = OUTPUT_SECTIONS[0],
        section_cognition = OUTPUT_SECTIONS[1],
        section_style = OUTPUT_SECTIONS[2],
        section_examples = OUTPUT_SECTIONS[3],
        section_patterns = OUTPUT_SECTIONS[4],
        output_language = output_language,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinate;

    fn sample_coords() -> CoordinateMap {
        let mut coords = CoordinateMap::new();
        coords.insert("matrix_core".into(), Coordinate::new(80, 20));
        coords.insert("matrix_social".into(), Coordinate::new(50, 50));
        coords
    }

    #[test]
    fn test_prompt_embeds_draft_and_signed_coordinates() {
        let tone = ToneSettings::detailed("casual", "normal", false, None);
        let prompt =
            build_refinement_prompt("# SOUL DRAFT\nbody", &tone, &sample_coords(), Locale::En);

        assert!(prompt.contains("# SOUL DRAFT\nbody"));
        assert!(prompt.contains("- matrix_core: x=60, y=60"));
        assert!(prompt.contains("- matrix_social: x=0, y=0"));
    }

    #[test]
    fn test_prompt_pins_output_format() {
        let tone = ToneSettings::detailed("敬語", "少ない", true, Some("ため息".into()));
        let prompt = build_refinement_prompt("draft", &tone, &sample_coords(), Locale::Ja);

        assert!(prompt.contains(SOUL_MARKER));
        for section in OUTPUT_SECTIONS {
            assert!(prompt.contains(section), "missing section {section}");
        }
        assert!(prompt.contains("**Japanese**"));
        assert!(prompt.contains("- **Emoji usage:** use actively"));
        assert!(prompt.contains("- **Additional preferences:** ため息"));
    }

    #[test]
    fn test_prompt_simple_mode_uses_summary() {
        let prompt = build_refinement_prompt(
            "draft",
            &ToneSettings::simple(""),
            &sample_coords(),
            Locale::En,
        );
        assert!(prompt.contains("- **Conversational tone:** Default Helper"));
        assert!(prompt.contains("**English**"));
    }
}
