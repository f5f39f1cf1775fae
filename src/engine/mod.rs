//! The deterministic persona-document engine.
//!
//! `generate` maps (tone settings, coordinate map, locale) to a fully
//! substituted Markdown draft. The pipeline is synchronous and pure: it
//! reads only the immutable configuration and the caller-supplied inputs,
//! so identical inputs produce byte-identical output and concurrent calls
//! need no locking.

pub mod classify;
pub mod normalize;
pub mod render;

pub use classify::{classify, Archetype};
pub use normalize::{normalize, DisplayCoordinate};

use crate::config::{default_config, SoulConfig};
use crate::types::{Coordinate, CoordinateMap, Locale, ToneSettings};

/// The persona engine facade.
///
/// Holds the immutable configuration and nothing else; safe to share and
/// to call concurrently.
#[derive(Debug, Clone)]
pub struct SoulEngine {
    config: SoulConfig,
}

impl SoulEngine {
    /// Build an engine over an already-validated configuration.
    pub fn new(config: SoulConfig) -> Self {
        Self { config }
    }

    /// Build an engine over the embedded default configuration.
    pub fn with_default_config() -> Self {
        Self::new(default_config().clone())
    }

    /// The configuration this engine renders from.
    pub fn config(&self) -> &SoulConfig {
        &self.config
    }

    /// Generate the deterministic persona draft.
    ///
    /// For each configured matrix, in configuration order: resolve the
    /// coordinate (center when absent), classify the quadrant, and append
    /// one archetype line plus, when a description exists in the requested
    /// locale, one policy line. Then substitute the three template
    /// placeholders.
    pub fn generate(
        &self,
        tone: &ToneSettings,
        coordinates: &CoordinateMap,
        locale: Locale,
    ) -> String {
        let mut archetype_lines = Vec::with_capacity(self.config.matrices.len());
        let mut policy_lines = Vec::with_capacity(self.config.matrices.len());

        for matrix in &self.config.matrices {
            let coord = coordinates
                .get(&matrix.id)
                .copied()
                .unwrap_or(Coordinate::CENTER);
            let display = normalize(coord);
            let archetype = classify(matrix, coord, locale);

            archetype_lines.push(format!(
                "- **{}:** {} (x:{}, y:{})",
                matrix.title(locale),
                archetype.label,
                display.x,
                display.y,
            ));
            if let Some(description) = archetype.description {
                policy_lines.push(format!(
                    "- **{} Policy:** {}",
                    matrix.title(locale),
                    description,
                ));
            }
        }

        render::render(
            self.config.system_template.get(locale),
            &archetype_lines,
            &tone.summary(locale),
            &policy_lines,
        )
    }
}

impl Default for SoulEngine {
    fn default() -> Self {
        Self::with_default_config()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SoulConfig;

    fn default_tone() -> ToneSettings {
        ToneSettings::detailed("普通", "普通", false, None)
    }

    /// One-matrix configuration used by the scenario tests.
    fn single_matrix_config() -> SoulConfig {
        let json = serde_json::json!({
            "systemTemplate": {
                "ja": "# ドラフト\n{{archetypes}}\nトーン: {{tone}}\n{{policies}}\n",
                "en": "# Draft\n{{archetypes}}\nTone: {{tone}}\n{{policies}}\n"
            },
            "matrices": [{
                "id": "matrix_core",
                "label": "核", "labelEn": "Core",
                "xAxis": { "id": "x", "labelMin": "安定", "labelMax": "変化",
                           "labelMinEn": "Stability", "labelMaxEn": "Change" },
                "yAxis": { "id": "y", "labelMin": "慎重", "labelMax": "大胆",
                           "labelMinEn": "Cautious", "labelMaxEn": "Bold" },
                "quadrants": {
                    "topLeft": { "label": "甲", "labelEn": "A" },
                    "topRight": { "label": "乙", "labelEn": "B" },
                    "bottomLeft": { "label": "丙", "labelEn": "C" },
                    "bottomRight": {
                        "label": "丁", "labelEn": "D",
                        "description": "calm and decisive",
                        "descriptionEn": "calm and decisive"
                    }
                }
            }]
        })
        .to_string();
        SoulConfig::from_json(&json).unwrap()
    }

    #[test]
    fn test_generate_is_deterministic() {
        let engine = SoulEngine::with_default_config();
        let mut coords = CoordinateMap::new();
        coords.insert("matrix_core".into(), Coordinate::new(12, 87));
        coords.insert("matrix_social".into(), Coordinate::new(70, 30));
        let tone = ToneSettings::detailed("ため口", "多い", true, Some("結論から話す".into()));

        let first = engine.generate(&tone, &coords, Locale::Ja);
        let second = engine.generate(&tone, &coords, Locale::Ja);
        assert_eq!(first, second);
    }

    #[test]
    fn test_absent_matrix_defaults_to_center() {
        let engine = SoulEngine::new(single_matrix_config());
        let out = engine.generate(&default_tone(), &CoordinateMap::new(), Locale::En);
        // Center classifies bottom-right and displays as (0, 0).
        assert!(out.contains("- **Core:** D (x:0, y:0)"));
        assert!(out.contains("- **Core Policy:** calm and decisive"));
    }

    #[test]
    fn test_scenario_ja_output() {
        let engine = SoulEngine::new(single_matrix_config());
        let mut coords = CoordinateMap::new();
        coords.insert("matrix_core".into(), Coordinate::new(80, 20));
        let tone = ToneSettings::detailed("casual", "normal", false, None);

        let out = engine.generate(&tone, &coords, Locale::Ja);
        assert!(out.contains("- **核:** 丁 (x:60, y:60)"));
        assert!(out.contains("- **核 Policy:** calm and decisive"));
        assert!(out.contains("[casual] 会話量:normal"));
        assert!(!out.contains("絵文字あり"));
    }

    #[test]
    fn test_no_placeholder_tokens_survive() {
        let engine = SoulEngine::with_default_config();
        for locale in [Locale::Ja, Locale::En] {
            let out = engine.generate(&default_tone(), &CoordinateMap::new(), locale);
            assert!(!out.contains("{{archetypes}}"));
            assert!(!out.contains("{{tone}}"));
            assert!(!out.contains("{{policies}}"));
        }
    }

    #[test]
    fn test_one_archetype_line_per_matrix() {
        let engine = SoulEngine::with_default_config();
        let out = engine.generate(&default_tone(), &CoordinateMap::new(), Locale::En);

        let archetype_count = engine
            .config()
            .matrices
            .iter()
            .filter(|m| out.contains(&format!("- **{}:**", m.label_en)))
            .count();
        assert_eq!(archetype_count, engine.config().matrices.len());

        // matrix_expression's bottom-right quadrant has no description, so
        // the default center leaves it without a policy line.
        assert!(!out.contains("- **Expression Policy:**"));
        assert!(out.contains("- **Core Stance Policy:**"));
    }

    #[test]
    fn test_locale_isolation() {
        let engine = SoulEngine::with_default_config();
        let tone = ToneSettings::detailed("casual", "normal", true, None);
        let en = engine.generate(&tone, &CoordinateMap::new(), Locale::En);
        let ja = engine.generate(&tone, &CoordinateMap::new(), Locale::Ja);

        for matrix in &engine.config().matrices {
            assert!(!en.contains(matrix.label.as_str()));
            assert!(!ja.contains(matrix.label_en.as_str()));
        }
        assert!(en.contains("Amount:normal"));
        assert!(!en.contains("会話量"));
        assert!(ja.contains("会話量:normal"));
        assert!(!ja.contains("Amount:"));
    }

    #[test]
    fn test_simple_tone_mode_shares_pipeline() {
        let engine = SoulEngine::new(single_matrix_config());
        let out = engine.generate(
            &ToneSettings::simple(""),
            &CoordinateMap::new(),
            Locale::En,
        );
        assert!(out.contains("Tone: Default Helper"));
        assert!(out.contains("- **Core:** D (x:0, y:0)"));
    }
}
