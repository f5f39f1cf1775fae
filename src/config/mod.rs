//! Persona configuration asset.
//!
//! The configuration is an immutable, externally supplied document: two
//! locale template strings (each carrying the three named placeholders
//! exactly once) plus the ordered list of matrix definitions. It is loaded
//! once, validated fail-fast, and read-only thereafter. A default bilingual
//! asset is embedded at compile time, the same way prompt translations are
//! usually shipped with the binary.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Locale, QuadrantPosition};

/// Embedded default configuration (used when no custom file is provided).
const EMBEDDED_CONFIG_JSON: &str = include_str!("soul_config.json");

/// Placeholder for the ordered archetype-line block.
pub const ARCHETYPES_PLACEHOLDER: &str = "{{archetypes}}";
/// Placeholder for the one-line tone summary.
pub const TONE_PLACEHOLDER: &str = "{{tone}}";
/// Placeholder for the ordered policy-line block.
pub const POLICIES_PLACEHOLDER: &str = "{{policies}}";

/// All placeholders a locale template must contain exactly once.
pub const REQUIRED_PLACEHOLDERS: [&str; 3] = [
    ARCHETYPES_PLACEHOLDER,
    TONE_PLACEHOLDER,
    POLICIES_PLACEHOLDER,
];

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// One axis of a matrix: an id plus min/max display labels in both locales.
///
/// Axis labels drive the interactive pad only; the classifier never reads
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisDef {
    pub id: String,
    /// Display label for the 0 end (Japanese).
    pub label_min: String,
    /// Display label for the 100 end (Japanese).
    pub label_max: String,
    /// Display label for the 0 end (English).
    pub label_min_en: String,
    /// Display label for the 100 end (English).
    pub label_max_en: String,
}

impl AxisDef {
    pub fn label_min(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ja => &self.label_min,
            Locale::En => &self.label_min_en,
        }
    }

    pub fn label_max(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ja => &self.label_max,
            Locale::En => &self.label_max_en,
        }
    }
}

/// One quadrant descriptor: a label and an optional behavioral description,
/// each per locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantDef {
    /// Japanese label.
    pub label: String,
    /// English label.
    pub label_en: String,
    /// Japanese description. Absent or empty means no policy line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// English description. Absent or empty means no policy line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
}

impl QuadrantDef {
    pub fn label(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ja => &self.label,
            Locale::En => &self.label_en,
        }
    }

    /// Description in the requested locale; `None` when the field is absent
    /// or empty (then the matrix contributes no policy line).
    pub fn description(&self, locale: Locale) -> Option<&str> {
        let text = match locale {
            Locale::Ja => self.description.as_deref(),
            Locale::En => self.description_en.as_deref(),
        };
        text.filter(|t| !t.is_empty())
    }
}

/// The four quadrant descriptors of a matrix, one per named slot.
///
/// A fixed-shape record rather than a keyed map, so a configuration with a
/// missing quadrant is rejected at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quadrants {
    pub top_left: QuadrantDef,
    pub top_right: QuadrantDef,
    pub bottom_left: QuadrantDef,
    pub bottom_right: QuadrantDef,
}

impl Quadrants {
    /// The descriptor at a classified position.
    pub fn at(&self, position: QuadrantPosition) -> &QuadrantDef {
        match position {
            QuadrantPosition::TopLeft => &self.top_left,
            QuadrantPosition::TopRight => &self.top_right,
            QuadrantPosition::BottomLeft => &self.bottom_left,
            QuadrantPosition::BottomRight => &self.bottom_right,
        }
    }
}

/// One named 2-D trait matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixDef {
    /// Unique id, the key callers use in a coordinate map.
    pub id: String,
    /// Japanese title.
    pub label: String,
    /// English title.
    pub label_en: String,
    /// Optional provenance note (Japanese).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Optional provenance note (English).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_en: Option<String>,
    pub x_axis: AxisDef,
    pub y_axis: AxisDef,
    pub quadrants: Quadrants,
}

impl MatrixDef {
    /// The matrix title in the requested locale.
    pub fn title(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ja => &self.label,
            Locale::En => &self.label_en,
        }
    }
}

/// The bilingual template pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemTemplate {
    pub ja: String,
    pub en: String,
}

impl SystemTemplate {
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ja => &self.ja,
            Locale::En => &self.en,
        }
    }
}

// ---------------------------------------------------------------------------
// SoulConfig
// ---------------------------------------------------------------------------

/// The full persona configuration: template pair plus ordered matrices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoulConfig {
    pub system_template: SystemTemplate,
    pub matrices: Vec<MatrixDef>,
}

impl SoulConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SoulConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Check the invariants the engine relies on.
    ///
    /// Each locale template must contain each required placeholder exactly
    /// once, matrix ids must be unique, and at least one matrix must be
    /// defined. Violations are configuration defects surfaced to the
    /// operator, not runtime errors of the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (locale, template) in [
            (Locale::Ja, self.system_template.ja.as_str()),
            (Locale::En, self.system_template.en.as_str()),
        ] {
            for placeholder in REQUIRED_PLACEHOLDERS {
                match template.matches(placeholder).count() {
                    0 => {
                        return Err(ConfigError::MissingPlaceholder {
                            locale,
                            placeholder,
                        })
                    }
                    1 => {}
                    _ => {
                        return Err(ConfigError::DuplicatePlaceholder {
                            locale,
                            placeholder,
                        })
                    }
                }
            }
        }

        if self.matrices.is_empty() {
            return Err(ConfigError::NoMatrices);
        }

        let mut seen = HashSet::new();
        for matrix in &self.matrices {
            if !seen.insert(matrix.id.as_str()) {
                return Err(ConfigError::DuplicateMatrixId {
                    id: matrix.id.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Global cached default configuration, parsed from the embedded asset.
static DEFAULT_CONFIG: OnceLock<SoulConfig> = OnceLock::new();

/// The embedded default configuration.
///
/// # Panics
/// Panics if the embedded asset is malformed; that is a build defect, not a
/// runtime condition.
pub fn default_config() -> &'static SoulConfig {
    DEFAULT_CONFIG.get_or_init(|| {
        SoulConfig::from_json(EMBEDDED_CONFIG_JSON)
            .expect("embedded soul_config.json is invalid")
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
