//! Shared value types for the persona engine.
//!
//! Everything here is caller-owned input state: the engine itself keeps no
//! mutable state between generations, so these types are passed by reference
//! into every [`crate::engine::SoulEngine::generate`] call and recomputed
//! from scratch each time.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Output locale for a generated persona document.
///
/// Every localized configuration field carries both variants; selection is a
/// plain lookup, never a fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    En,
    /// Japanese (the default output language of the original tool).
    #[default]
    Ja,
}

impl Locale {
    /// The lowercase language tag ("en" / "ja").
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A raw coordinate on one matrix pad, each axis in `[0, 100]`.
///
/// The interactive surface owns this state and should never produce values
/// outside the range; [`Coordinate::clamped`] exists so the engine does not
/// have to trust that invariant blindly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    /// The pad center. Matrices absent from a [`CoordinateMap`] default here.
    pub const CENTER: Coordinate = Coordinate { x: 50, y: 50 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamp both axes into `[0, 100]`.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0, 100),
            y: self.y.clamp(0, 100),
        }
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Per-matrix coordinates, keyed by matrix id.
///
/// A `BTreeMap` keeps iteration deterministic wherever the map itself is
/// walked (e.g. the refinement prompt's coordinate context).
pub type CoordinateMap = BTreeMap<String, Coordinate>;

// ---------------------------------------------------------------------------
// Quadrant positions
// ---------------------------------------------------------------------------

/// One of the four labeled regions of a matrix.
///
/// The tie-break is asymmetric on purpose (it mirrors the behavior the
/// interactive tool shipped with): the horizontal midpoint belongs to the
/// right half, the vertical midpoint to the bottom half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuadrantPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl QuadrantPosition {
    /// Classify a raw coordinate into its quadrant.
    ///
    /// Left: `x < 50`. Right: `x >= 50`. Top: `y > 50`. Bottom: `y <= 50`.
    pub fn classify(coord: Coordinate) -> Self {
        let c = coord.clamped();
        match (c.x < 50, c.y > 50) {
            (true, true) => QuadrantPosition::TopLeft,
            (true, false) => QuadrantPosition::BottomLeft,
            (false, true) => QuadrantPosition::TopRight,
            (false, false) => QuadrantPosition::BottomRight,
        }
    }
}

// ---------------------------------------------------------------------------
// Tone settings
// ---------------------------------------------------------------------------

/// Japanese tone presets offered by the interactive surface.
pub const TONE_PRESETS_JA: [&str; 3] = ["ため口", "普通", "敬語"];

/// Japanese conversation-volume presets offered by the interactive surface.
pub const AMOUNT_PRESETS_JA: [&str; 3] = ["少ない", "普通", "多い"];

/// Conversational tone settings for one generation call.
///
/// Two generation modes share the rest of the engine: the detailed mode is
/// the primary path; the simple mode is the legacy single-free-text path
/// with a fixed fallback when the text is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ToneSettings {
    /// Rich multi-field tone settings.
    Detailed {
        /// Conversational register (preset or free text).
        tone: String,
        /// Verbosity level (preset or free text).
        amount: String,
        /// Whether the persona uses emoji.
        use_emoji: bool,
        /// Optional free-text extra flavor.
        additional: Option<String>,
    },
    /// Legacy single free-text tone.
    Simple {
        /// Free-text tone; empty falls back to the default helper string.
        tone: String,
    },
}

impl ToneSettings {
    /// Detailed-mode constructor.
    pub fn detailed(
        tone: impl Into<String>,
        amount: impl Into<String>,
        use_emoji: bool,
        additional: Option<String>,
    ) -> Self {
        ToneSettings::Detailed {
            tone: tone.into(),
            amount: amount.into(),
            use_emoji,
            additional,
        }
    }

    /// Simple-mode constructor.
    pub fn simple(tone: impl Into<String>) -> Self {
        ToneSettings::Simple { tone: tone.into() }
    }

    /// Render the one-line tone summary substituted into the template.
    ///
    /// Detailed mode: `[<tone>] <amount-label>:<amount>`, then the emoji
    /// indicator only when `use_emoji` is set, then ` / <additional>` only
    /// when the additional text is non-empty. Clause order is fixed.
    pub fn summary(&self, locale: Locale) -> String {
        match self {
            ToneSettings::Detailed {
                tone,
                amount,
                use_emoji,
                additional,
            } => {
                let amount_label = match locale {
                    Locale::Ja => "会話量",
                    Locale::En => "Amount",
                };
                let mut out = format!("[{}] {}:{}", tone, amount_label, amount);
                if *use_emoji {
                    out.push_str(match locale {
                        Locale::Ja => " (絵文字あり)",
                        Locale::En => " (with emoji)",
                    });
                }
                if let Some(extra) = additional {
                    if !extra.trim().is_empty() {
                        out.push_str(" / ");
                        out.push_str(extra);
                    }
                }
                out
            }
            ToneSettings::Simple { tone } => {
                if tone.trim().is_empty() {
                    match locale {
                        Locale::Ja => "デフォルトヘルパー".to_string(),
                        Locale::En => "Default Helper".to_string(),
                    }
                } else {
                    tone.clone()
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
