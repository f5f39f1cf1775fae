//! Crate error taxonomy.
//!
//! Failures concentrate at two places: configuration load time
//! ([`ConfigError`], fatal, never silently patched) and the refinement
//! boundary ([`RefineError`], always recoverable at the call site — the
//! caller keeps the last deterministic draft). The deterministic engine
//! itself never fails for validated configuration: out-of-range coordinates
//! are clamped, absent coordinates default to the pad center.

use thiserror::Error;

use crate::types::Locale;

/// Malformed or incomplete persona configuration. Fatal at load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A locale template does not contain a required placeholder.
    #[error("template for locale '{locale}' is missing placeholder {placeholder}")]
    MissingPlaceholder {
        locale: Locale,
        placeholder: &'static str,
    },

    /// A locale template contains a placeholder more than once; only the
    /// first occurrence would ever be substituted.
    #[error("template for locale '{locale}' contains placeholder {placeholder} more than once")]
    DuplicatePlaceholder {
        locale: Locale,
        placeholder: &'static str,
    },

    /// Two matrices share an id.
    #[error("duplicate matrix id '{id}' in configuration")]
    DuplicateMatrixId { id: String },

    /// The configuration defines no matrices at all.
    #[error("configuration defines no matrices")]
    NoMatrices,

    /// The configuration document is not valid JSON for the expected schema.
    #[error("failed to parse persona configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read persona configuration file: {0}")]
    Io(#[from] std::io::Error),
}

/// The refinement collaborator boundary failed.
///
/// One terminal error per attempt; no automatic retry and no partial-result
/// recovery. Retries, if desired, are a caller policy.
#[derive(Debug, Error)]
pub enum RefineError {
    /// No API key configured. Surfaced before any network I/O.
    #[error("no Gemini API key configured; set GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingApiKey,

    /// Transport-level failure (connect, timeout, mid-stream disconnect).
    #[error("refinement request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The generation service reported an error.
    #[error("generation service error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A streamed payload could not be parsed.
    #[error("malformed streaming response: {0}")]
    MalformedResponse(String),

    /// The service finished without producing a usable document.
    #[error("generation service returned an empty document")]
    EmptyResponse,
}
