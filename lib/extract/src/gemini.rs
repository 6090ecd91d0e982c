//! Blocking Gemini REST client.
//!
//! Talks to the `generateContent` endpoint directly over HTTPS. Images ride
//! inline as base64 `inlineData` parts. The client performs exactly one
//! HTTP request per [`ModelClient::generate`] call; any retry budget
//! belongs to the orchestrator, which counts model calls, not transports.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::model::{text_head, ImagePayload, ModelClient, ModelError};

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Error bodies are logged and propagated truncated to this many chars.
const ERROR_BODY_HEAD: usize = 200;

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f64>,
    max_output_tokens: Option<u32>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        GeminiClient {
            http: reqwest::blocking::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Overrides the API base URL, for proxies and compatible endpoints.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets sampling parameters sent as `generationConfig`. Unset values
    /// are omitted from the request and left to server defaults.
    pub fn generation(mut self, temperature: Option<f64>, max_output_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }

    fn build_body(&self, prompt: &str, image: Option<&ImagePayload>) -> Value {
        let mut parts = vec![json!({"text": prompt})];
        if let Some(img) = image {
            parts.push(json!({
                "inlineData": {
                    "mimeType": img.mime_type,
                    "data": BASE64.encode(&img.data),
                }
            }));
        }

        let mut body = json!({
            "contents": [{"parts": parts}],
        });

        let mut config = Map::new();
        if let Some(temp) = self.temperature {
            config.insert("temperature".to_string(), json!(temp));
        }
        if let Some(max) = self.max_output_tokens {
            config.insert("maxOutputTokens".to_string(), json!(max));
        }
        if !config.is_empty() {
            body["generationConfig"] = Value::Object(config);
        }
        body
    }

    /// Joins the text parts of the first candidate. Non-text parts are
    /// skipped; an all-blank reply counts as no text.
    fn parse_reply(value: &Value) -> Option<String> {
        let parts = value
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .as_array()?;
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl ModelClient for GeminiClient {
    fn generate(&self, prompt: &str, image: Option<&ImagePayload>) -> Result<String, ModelError> {
        let body = self.build_body(prompt, image);
        debug!(model = %self.model, with_image = image.is_some(), "gemini request");

        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .map_err(|e| ModelError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body_text = response.text().unwrap_or_default();
            let message = format!(
                "API error {}: {}",
                status.as_u16(),
                text_head(&body_text, ERROR_BODY_HEAD)
            );
            warn!(status = status.as_u16(), "gemini error: {message}");

            return match status.as_u16() {
                401 | 403 => Err(ModelError::Auth(message)),
                429 => Err(ModelError::RateLimited {
                    message,
                    retry_after_secs: retry_after,
                }),
                code => Err(ModelError::Api {
                    status: code,
                    message,
                }),
            };
        }

        let value: Value = response
            .json()
            .map_err(|e| ModelError::Transport(format!("invalid response body: {e}")))?;
        Self::parse_reply(&value).ok_or(ModelError::EmptyResponse)
    }
}
