//! Gemini-backed [`SuggestionGenerator`].

use async_trait::async_trait;

use breezy_gemini::{GeminiClient, GeminiError};

use crate::suggestions::service::{SuggestionError, SuggestionGenerator};

/// Adapts [`GeminiClient`] to the orchestrator's generator seam.
pub struct GeminiGenerator {
    client: GeminiClient,
}

impl GeminiGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SuggestionGenerator for GeminiGenerator {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, SuggestionError> {
        self.client
            .generate(api_key, prompt)
            .await
            .map_err(|err| match err {
                GeminiError::MissingApiKey => SuggestionError::MissingCredential,
                GeminiError::Api { status, body } => SuggestionError::Upstream {
                    status,
                    detail: body,
                },
                GeminiError::Request(e) => SuggestionError::Unavailable(e.to_string()),
            })
    }
}
