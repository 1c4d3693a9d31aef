//! Integration tests for routing, middleware, and the request paths that
//! answer before any database or upstream I/O.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, get, post_json, test_config};
use tower::ServiceExt;

use breezy_api::auth::jwt::generate_access_token;

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let app = build_test_app();

    // CORS preflight requires custom headers, so we build the request manually.
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/auth/login")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("Missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "http://localhost:5173");

    let allow_methods = response
        .headers()
        .get("access-control-allow-methods")
        .expect("Missing Access-Control-Allow-Methods header")
        .to_str()
        .unwrap();
    assert!(
        allow_methods.contains("POST"),
        "Allow-Methods should contain POST, got: {allow_methods}"
    );
}

// ---------------------------------------------------------------------------
// Test: protected resources reject unauthenticated requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn protected_routes_require_auth() {
    for uri in ["/api/auth/me", "/api/profile", "/api/feedback/recent"] {
        let app = build_test_app();
        let response = get(app, uri).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{uri} must require authentication"
        );
    }

    let app = build_test_app();
    let response = post_json(
        app,
        "/api/suggestions/allergy",
        None,
        serde_json::json!({ "apiKey": "user-key", "env": {} }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_bearer_token_is_rejected() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/suggestions/outfit",
        Some("not-a-real-token"),
        serde_json::json!({ "apiKey": "user-key", "env": {} }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Test: suggestion requests without a Gemini key short-circuit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn suggestion_without_api_key_is_rejected_before_io() {
    let config = test_config();
    let token = generate_access_token(1, &config.jwt).expect("token should generate");

    // The pool is lazy and the Gemini URL unroutable: a 400 here proves the
    // request was rejected before any store or generator call.
    for uri in ["/api/suggestions/allergy", "/api/suggestions/outfit"] {
        let app = build_test_app();
        let response = post_json(
            app,
            uri,
            Some(&token),
            serde_json::json!({ "apiKey": "", "env": {}, "forceRefresh": true }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Missing Gemini API key");
    }
}

#[tokio::test]
async fn suggestion_accepts_spec_credential_alias() {
    let config = test_config();
    let token = generate_access_token(1, &config.jwt).expect("token should generate");

    // An empty `credential` must behave exactly like an empty `apiKey`.
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/suggestions/allergy",
        Some(&token),
        serde_json::json!({ "credential": "", "env": {} }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: register input validation answers before the database
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_with_invalid_email_is_rejected() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/auth/register",
        None,
        serde_json::json!({ "email": "not-an-email", "password": "long-enough-password" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn register_with_short_password_is_rejected() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/auth/register",
        None,
        serde_json::json!({ "email": "user@example.com", "password": "short" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
