//! HTTP adapter for the Google Gemini `generateContent` API.
//!
//! [`GeminiClient`] wraps a [`reqwest::Client`] for a single upstream
//! endpoint. The caller supplies the API key per request -- keys are never
//! stored or logged by this crate.

pub mod client;
pub mod response;

pub use client::{GeminiClient, GeminiError, DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL};
pub use response::extract_text;
