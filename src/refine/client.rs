//! Gemini-backed refinement client.
//!
//! Posts the refinement prompt to the Gemini streaming endpoint, folds the
//! SSE fragments into one document, and runs defensive cleanup on the
//! result. One attempt per call: failures surface as a single terminal
//! [`RefineError`] and the caller keeps its last deterministic draft.

use std::time::Duration;

use serde_json::{json, Value};

use crate::error::RefineError;
use crate::refine::cleanup::clean_refined_output;
use crate::refine::prompt::build_refinement_prompt;
use crate::refine::stream::{collect_text, SseTextStream};
use crate::types::{CoordinateMap, Locale, ToneSettings};

/// Default Gemini model for refinement.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Reasoning effort requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThinkingLevel {
    Low,
    Medium,
    #[default]
    High,
}

impl ThinkingLevel {
    fn as_str(&self) -> &'static str {
        match self {
            ThinkingLevel::Low => "LOW",
            ThinkingLevel::Medium => "MEDIUM",
            ThinkingLevel::High => "HIGH",
        }
    }
}

/// Tunables for the refinement call.
#[derive(Debug, Clone)]
pub struct RefineOptions {
    /// Gemini model identifier.
    pub model: String,
    /// Reasoning effort; refinement defaults to high.
    pub thinking_level: ThinkingLevel,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            thinking_level: ThinkingLevel::High,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ---------------------------------------------------------------------------
// SoulRefiner
// ---------------------------------------------------------------------------

/// Client for the external refinement collaborator.
#[derive(Debug, Clone)]
pub struct SoulRefiner {
    api_key: String,
    options: RefineOptions,
    client: reqwest::Client,
}

impl SoulRefiner {
    /// Build a refiner with an explicit API key.
    pub fn new(api_key: impl Into<String>, options: RefineOptions) -> Result<Self, RefineError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RefineError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            api_key,
            options,
            client,
        })
    }

    /// Build a refiner from `GEMINI_API_KEY` or `GOOGLE_API_KEY`.
    ///
    /// A missing key fails here, before any network I/O.
    pub fn from_env() -> Result<Self, RefineError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| RefineError::MissingApiKey)?;
        Self::new(api_key, RefineOptions::default())
    }

    /// The streaming endpoint for the configured model.
    fn endpoint(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.options.model
        )
    }

    /// Build the Gemini request body for one prompt.
    fn build_request_body(&self, prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "thinkingConfig": {
                    "thinkingLevel": self.options.thinking_level.as_str(),
                },
            },
        })
    }

    /// Rewrite a deterministic draft into a refined persona document.
    ///
    /// Sends the draft plus the same tone settings and coordinates the
    /// engine rendered it from, consumes the streamed fragments, and cleans
    /// up fencing/preamble. Returns [`RefineError::EmptyResponse`] if the
    /// service produced nothing usable.
    pub async fn refine(
        &self,
        draft: &str,
        tone: &ToneSettings,
        coordinates: &CoordinateMap,
        locale: Locale,
    ) -> Result<String, RefineError> {
        let prompt = build_refinement_prompt(draft, tone, coordinates, locale);
        let raw = self.stream_generate(&prompt).await?;
        let cleaned = clean_refined_output(&raw);
        if cleaned.is_empty() {
            return Err(RefineError::EmptyResponse);
        }
        Ok(cleaned)
    }

    /// Issue the streaming request and fold the fragments into one string.
    async fn stream_generate(&self, prompt: &str) -> Result<String, RefineError> {
        log::debug!(
            "refinement request: model={}, thinking={}",
            self.options.model,
            self.options.thinking_level.as_str(),
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .query(&[("key", self.api_key.as_str())])
            .json(&self.build_request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::warn!("refinement request rejected: {status}");
            return Err(RefineError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let mut stream = SseTextStream::new(Box::pin(response.bytes_stream()));
        collect_text(&mut stream).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_fails_fast() {
        let err = SoulRefiner::new("", RefineOptions::default()).unwrap_err();
        assert!(matches!(err, RefineError::MissingApiKey));
    }

    #[test]
    fn test_endpoint_targets_streaming_sse() {
        let refiner = SoulRefiner::new("test-key", RefineOptions::default()).unwrap();
        let endpoint = refiner.endpoint();
        assert!(endpoint.contains(DEFAULT_MODEL));
        assert!(endpoint.ends_with(":streamGenerateContent?alt=sse"));
    }

    #[test]
    fn test_request_body_shape() {
        let refiner = SoulRefiner::new("test-key", RefineOptions::default()).unwrap();
        let body = refiner.build_request_body("hello");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            body["generationConfig"]["thinkingConfig"]["thinkingLevel"],
            "HIGH"
        );
    }

    #[test]
    fn test_custom_model_in_endpoint() {
        let options = RefineOptions {
            model: "gemini-2.5-pro".into(),
            thinking_level: ThinkingLevel::Medium,
            ..RefineOptions::default()
        };
        let refiner = SoulRefiner::new("test-key", options).unwrap();
        assert!(refiner.endpoint().contains("gemini-2.5-pro"));
        assert_eq!(
            refiner.build_request_body("p")["generationConfig"]["thinkingConfig"]["thinkingLevel"],
            "MEDIUM"
        );
    }
}
