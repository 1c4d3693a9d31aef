use std::sync::Arc;

use crate::config::ServerConfig;
use crate::suggestions::SuggestionService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: breezy_db::DbPool,
    /// Server configuration (env-derived, immutable after startup).
    pub config: Arc<ServerConfig>,
    /// HTTP client for the weather/AQI upstream proxies.
    pub http: reqwest::Client,
    /// Daily AI-suggestion orchestrator (cache + budget + generator).
    pub suggestions: Arc<SuggestionService>,
}
