//! # soulforge
//!
//! Deterministic persona-document engine with optional LLM refinement.
//!
//! A caller describes a personality through a small set of 2-D coordinate
//! matrices plus tone settings; [`engine::SoulEngine`] deterministically
//! renders those inputs into a structured Markdown persona document
//! ("soul.md"), and [`refine::SoulRefiner`] can optionally send that draft
//! to a hosted model to be rewritten into a richer, instruction-formatted
//! document.
//!
//! The engine is pure and stateless across calls: identical inputs produce
//! byte-identical output, and the only shared resource is the immutable
//! configuration asset.
//!
//! ```
//! use soulforge::engine::SoulEngine;
//! use soulforge::types::{Coordinate, CoordinateMap, Locale, ToneSettings};
//!
//! let engine = SoulEngine::with_default_config();
//! let mut coordinates = CoordinateMap::new();
//! coordinates.insert("matrix_core".to_string(), Coordinate::new(80, 20));
//!
//! let tone = ToneSettings::detailed("casual", "normal", false, None);
//! let soul_md = engine.generate(&tone, &coordinates, Locale::En);
//! assert!(soul_md.contains("(x:60, y:60)"));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod refine;
pub mod types;

// Re-exports
pub use config::{default_config, SoulConfig};
pub use engine::SoulEngine;
pub use error::{ConfigError, RefineError};
pub use refine::SoulRefiner;
pub use types::{Coordinate, CoordinateMap, Locale, ToneSettings};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
