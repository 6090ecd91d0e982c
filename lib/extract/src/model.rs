//! Generative-model boundary.
//!
//! The pipeline only ever needs one capability from a model: text in (plus
//! an optional image), text out. [`ModelClient`] pins that boundary so the
//! orchestrator and the outfit selector stay testable with scripted
//! replies and swappable across providers.

use thiserror::Error;

/// Raw image bytes handed to a vision model, unmodified. Encoding for the
/// wire (base64, data URLs) is the client's business.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        ImagePayload {
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// Upstream failure classification.
///
/// Auth and rate-limit failures are worth telling apart from generic API
/// errors: callers surface them differently and a rate limit carries an
/// optional retry hint.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },

    #[error("model API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text")]
    EmptyResponse,
}

/// A blocking generative-model call.
///
/// Implementations must be shareable across worker threads; the HTTP shell
/// invokes this from a blocking pool.
pub trait ModelClient: Send + Sync {
    /// Sends `prompt` (and optionally one image) to the model and returns
    /// the raw reply text. No JSON expectations at this layer.
    fn generate(&self, prompt: &str, image: Option<&ImagePayload>) -> Result<String, ModelError>;
}

/// Char-safe prefix of `text`, at most `max_chars` characters.
///
/// Diagnostic notes and error bodies get truncated all over the pipeline;
/// byte slicing would panic mid-codepoint on non-ASCII model output.
pub(crate) fn text_head(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_head_ascii() {
        assert_eq!(text_head("abcdef", 3), "abc");
        assert_eq!(text_head("ab", 5), "ab");
        assert_eq!(text_head("", 5), "");
    }

    #[test]
    fn test_text_head_multibyte() {
        let s = "héllo wörld";
        assert_eq!(text_head(s, 4), "héll");
        assert_eq!(text_head("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_text_head_zero() {
        assert_eq!(text_head("abc", 0), "");
    }
}
