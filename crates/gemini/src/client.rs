//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use crate::response::{extract_text, GenerateContentResponse};

/// Model invoked when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default upstream base URL.
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Single-attempt request timeout. There is no retry: a slow or failed
/// upstream call fails the whole suggestion request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Error bodies are truncated to this many bytes before being surfaced.
const MAX_ERROR_BODY_BYTES: usize = 800;

/// Errors from the Gemini adapter.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// The caller supplied an empty API key. Checked before any I/O.
    #[error("Missing Gemini API key")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Gemini request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated to [`MAX_ERROR_BODY_BYTES`].
        body: String,
    },
}

/// Client for one Gemini model behind one base URL.
pub struct GeminiClient {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for the given base URL and model.
    pub fn new(api_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            model: model.into(),
        }
    }

    /// Create a client against the public endpoint with the default model.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL)
    }

    /// Configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Call `generateContent` with the given prompt and return the raw
    /// generated text (first candidate, parts joined with newlines).
    ///
    /// The API key authenticates the request via the `key` query parameter
    /// and is neither stored nor logged. An empty or malformed payload
    /// returns an empty string, not an error.
    pub async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GeminiError> {
        if api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let url = format!(
            "{}/v1/models/{}:generateContent",
            self.api_url, self.model
        );
        let payload = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(status = status.as_u16(), model = %self.model, "Gemini HTTP error");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        Ok(extract_text(&payload))
    }
}

/// Truncate an error body on a character boundary for diagnostics.
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
