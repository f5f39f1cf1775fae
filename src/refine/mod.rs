//! Refinement boundary — the one asynchronous collaborator in the system.
//!
//! The deterministic engine produces a draft; this module optionally sends
//! that draft to a hosted generation service to be rewritten into a richer,
//! instruction-formatted persona document. Everything here is boundary
//! plumbing: prompt serialization, streamed response consumption, and
//! defensive cleanup of the returned text.

pub mod cleanup;
pub mod client;
pub mod prompt;
pub mod stream;

pub use cleanup::{clean_refined_output, SOUL_MARKER};
pub use client::{RefineOptions, SoulRefiner, ThinkingLevel, DEFAULT_MODEL};
pub use prompt::{build_refinement_prompt, OUTPUT_SECTIONS};
pub use stream::{collect_text, SseTextStream, TextStream};
