//! Streamed text consumption for the refinement call.
//!
//! The generation service returns a finite, forward-only sequence of text
//! fragments over SSE. [`TextStream`] abstracts the transport so the fold
//! can be tested without a network; [`SseTextStream`] adapts a raw byte
//! stream into parsed fragments, one SSE `data:` payload at a time.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;

use crate::error::RefineError;

// ---------------------------------------------------------------------------
// TextStream
// ---------------------------------------------------------------------------

/// A finite, non-restartable stream of text fragments.
#[async_trait]
pub trait TextStream: Send {
    /// The next fragment, or `None` when the stream is complete.
    ///
    /// The first `Err` is terminal; callers must not poll again after it.
    async fn next_fragment(&mut self) -> Option<Result<String, RefineError>>;
}

/// Fold a text stream into one accumulated string.
///
/// The first failure surfaces as the single terminal error of the attempt;
/// no partial-result recovery is attempted mid-stream.
pub async fn collect_text(stream: &mut dyn TextStream) -> Result<String, RefineError> {
    let mut accumulated = String::new();
    while let Some(fragment) = stream.next_fragment().await {
        accumulated.push_str(&fragment?);
    }
    Ok(accumulated)
}

// ---------------------------------------------------------------------------
// SSE parsing
// ---------------------------------------------------------------------------

/// Extract the concatenated candidate text from one SSE JSON payload.
///
/// Payloads without text (usage metadata, finish markers) yield `None`.
/// A payload carrying an `error` object is the service reporting failure
/// mid-stream and becomes a terminal error.
pub fn text_from_payload(payload: &Value) -> Result<Option<String>, RefineError> {
    if let Some(error) = payload.get("error") {
        let status = error.get("code").and_then(Value::as_u64).unwrap_or(0) as u16;
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown generation service error")
            .to_string();
        return Err(RefineError::Api { status, message });
    }

    let parts = payload
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array);

    let Some(parts) = parts else {
        return Ok(None);
    };

    let mut text = String::new();
    for part in parts {
        if let Some(fragment) = part.get("text").and_then(Value::as_str) {
            text.push_str(fragment);
        }
    }

    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Parse one SSE line into an optional text fragment.
///
/// Non-`data:` lines (comments, blank event separators) carry nothing.
fn parse_sse_line(line: &str) -> Option<Result<String, RefineError>> {
    let line = line.trim();
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }

    let json: Value = match serde_json::from_str(payload) {
        Ok(json) => json,
        Err(err) => {
            return Some(Err(RefineError::MalformedResponse(format!(
                "invalid SSE payload: {err}"
            ))))
        }
    };

    match text_from_payload(&json) {
        Ok(Some(text)) => Some(Ok(text)),
        Ok(None) => None,
        Err(err) => Some(Err(err)),
    }
}

// ---------------------------------------------------------------------------
// SseTextStream
// ---------------------------------------------------------------------------

/// Adapts a raw SSE byte stream into parsed text fragments.
///
/// Bytes are buffered and split at line boundaries only, so multi-byte
/// characters split across transport chunks reassemble correctly.
pub struct SseTextStream<S> {
    inner: S,
    buffer: Vec<u8>,
    exhausted: bool,
}

impl<S> SseTextStream<S>
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin + Send,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            exhausted: false,
        }
    }

    /// Pop the next complete line out of the buffer, if any.
    fn drain_line(&mut self) -> Option<String> {
        let newline = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
        line.pop(); // the newline itself
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

#[async_trait]
impl<S> TextStream for SseTextStream<S>
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin + Send,
{
    async fn next_fragment(&mut self) -> Option<Result<String, RefineError>> {
        loop {
            while let Some(line) = self.drain_line() {
                if let Some(result) = parse_sse_line(&line) {
                    return Some(result);
                }
            }

            if self.exhausted {
                // Flush a final unterminated line, if the service sent one.
                if self.buffer.is_empty() {
                    return None;
                }
                let line = String::from_utf8_lossy(&std::mem::take(&mut self.buffer)).into_owned();
                return parse_sse_line(&line);
            }

            match self.inner.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(err)) => return Some(Err(RefineError::Http(err))),
                None => self.exhausted = true,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct MockStream(VecDeque<Result<String, RefineError>>);

    #[async_trait]
    impl TextStream for MockStream {
        async fn next_fragment(&mut self) -> Option<Result<String, RefineError>> {
            self.0.pop_front()
        }
    }

    fn payload(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[test]
    fn test_collect_text_preserves_order() {
        let mut stream = MockStream(VecDeque::from([
            Ok("# SOUL".to_string()),
            Ok(" DEFINITION".to_string()),
            Ok(": Title".to_string()),
        ]));
        let text = tokio_test::block_on(collect_text(&mut stream)).unwrap();
        assert_eq!(text, "# SOUL DEFINITION: Title");
    }

    #[test]
    fn test_collect_text_first_error_is_terminal() {
        let mut stream = MockStream(VecDeque::from([
            Ok("partial".to_string()),
            Err(RefineError::EmptyResponse),
        ]));
        let err = tokio_test::block_on(collect_text(&mut stream)).unwrap_err();
        assert!(matches!(err, RefineError::EmptyResponse));
    }

    #[test]
    fn test_parse_sse_line_extracts_text() {
        let line = format!("data: {}", payload("hello"));
        let fragment = parse_sse_line(&line).unwrap().unwrap();
        assert_eq!(fragment, "hello");
    }

    #[test]
    fn test_parse_sse_line_skips_non_data() {
        assert!(parse_sse_line("").is_none());
        assert!(parse_sse_line(": keep-alive").is_none());
        assert!(parse_sse_line("data: [DONE]").is_none());
    }

    #[test]
    fn test_payload_error_object_is_terminal() {
        let json = serde_json::json!({
            "error": { "code": 429, "message": "quota exceeded" }
        });
        let err = text_from_payload(&json).unwrap_err();
        match err {
            RefineError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_payload_without_text_yields_none() {
        let json = serde_json::json!({
            "usageMetadata": { "promptTokenCount": 42 }
        });
        assert!(text_from_payload(&json).unwrap().is_none());
    }

    #[test]
    fn test_sse_stream_reassembles_split_chunks() {
        let line = format!("data: {}\n\n", payload("断片テキスト"));
        let bytes = line.into_bytes();
        // Split mid multi-byte character.
        let (head, tail) = bytes.split_at(bytes.len() / 2);
        let chunks: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::copy_from_slice(head)),
            Ok(Bytes::copy_from_slice(tail)),
        ];
        let mut stream = SseTextStream::new(futures::stream::iter(chunks));
        let text = tokio_test::block_on(collect_text(&mut stream)).unwrap();
        assert_eq!(text, "断片テキスト");
    }

    #[test]
    fn test_sse_stream_flushes_unterminated_tail() {
        let line = format!("data: {}", payload("tail"));
        let chunks: Vec<reqwest::Result<Bytes>> = vec![Ok(Bytes::from(line.into_bytes()))];
        let mut stream = SseTextStream::new(futures::stream::iter(chunks));
        let text = tokio_test::block_on(collect_text(&mut stream)).unwrap();
        assert_eq!(text, "tail");
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let mut stream = SseTextStream::new(futures::stream::iter(vec![Ok::<_, reqwest::Error>(
            Bytes::from_static(b"data: {not json}\n"),
        )]));
        let err = tokio_test::block_on(collect_text(&mut stream)).unwrap_err();
        assert!(matches!(err, RefineError::MalformedResponse(_)));
    }
}
