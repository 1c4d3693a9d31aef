//! Route definitions, grouped per resource.

pub mod auth;
pub mod environment;
pub mod feedback;
pub mod health;
pub mod profile;
pub mod suggestion;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register              register (public)
/// /auth/login                 login (public)
/// /auth/me                    current user (requires auth)
///
/// /profile                    get, update profile (requires auth)
///
/// /feedback                   create feedback (requires auth)
/// /feedback/recent            most recent 10, newest first (requires auth)
///
/// /aqi                        AQI proxy (server-side key)
/// /aqi/nearest                nearest monitoring site by lat/lon
/// /weather                    CWA forecast proxy (server-side key)
///
/// /suggestions/allergy        allergy tips (requires auth; daily cache)
/// /suggestions/outfit         outfit advice (requires auth; daily cache)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (register, login, me).
        .nest("/auth", auth::router())
        // User profile.
        .nest("/profile", profile::router())
        // Feedback submissions and the generator's history window.
        .nest("/feedback", feedback::router())
        // Third-party AQI/weather proxies.
        .merge(environment::router())
        // Daily AI suggestions (cache + refresh budget).
        .nest("/suggestions", suggestion::router())
}
