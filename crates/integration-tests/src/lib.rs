//! Test harness for driving the storefront router in-process.
//!
//! Tests build the real router over the fixture catalog in `fixtures/`,
//! in-memory sessions and no database, then send requests with
//! `tower::ServiceExt::oneshot`. Session tokens are signed with the fixture
//! RSA key the test configuration trusts.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tenantmart-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use url::Url;

use tenantmart_storefront::app;
use tenantmart_storefront::config::{AuthConfig, ContentConfig, StorefrontConfig};
use tenantmart_storefront::middleware::create_session_layer;
use tenantmart_storefront::services::auth::SESSION_TOKEN_COOKIE;
use tenantmart_storefront::state::AppState;

/// Role claim that grants admin access in the test configuration.
pub const ADMIN_ROLE: &str = "admin";

/// Path to a file under `fixtures/`.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

/// Storefront configuration over the fixture catalog, without a database.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: Url::parse("http://localhost:3000").unwrap(),
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static"),
        auth: AuthConfig {
            jwt_public_key: read_fixture("session_public_key.pem"),
            issuer: None,
            authorized_parties: vec!["http://localhost:3000".to_string()],
            sign_in_url: Url::parse("https://accounts.tenantmart.test/sign-in").unwrap(),
            sign_up_url: Url::parse("https://accounts.tenantmart.test/sign-up").unwrap(),
            admin_role: ADMIN_ROLE.to_string(),
        },
        content: ContentConfig::Fixture(fixture_path("products.json")),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// The full storefront router with in-memory sessions.
#[must_use]
pub fn test_app() -> Router {
    let config = test_config();
    let session_layer = create_session_layer(MemoryStore::default(), &config);
    let state = AppState::new(config, None).unwrap();
    app::router(state, session_layer)
}

/// Sign arbitrary claims with the fixture key.
#[must_use]
pub fn sign_claims(claims: &Value) -> String {
    let key = EncodingKey::from_rsa_pem(read_fixture("session_signing_key.pem").as_bytes()).unwrap();
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
}

fn claims_for(user_id: &str, role: Option<&str>, expires_in: i64) -> Value {
    let now = chrono::Utc::now().timestamp();
    let mut claims = json!({
        "sub": user_id,
        "sid": format!("sess_{user_id}"),
        "azp": "http://localhost:3000",
        "email": format!("{user_id}@tenantmart.test"),
        "first_name": "Test",
        "last_name": "Shopper",
        "iat": now,
        "nbf": now - 10,
        "exp": now + expires_in,
    });
    if let Some(role) = role {
        claims["metadata"] = json!({ "role": role });
    }
    claims
}

/// A valid session token for a customer.
#[must_use]
pub fn user_token(user_id: &str) -> String {
    sign_claims(&claims_for(user_id, None, 3600))
}

/// A valid session token carrying the admin role.
#[must_use]
pub fn admin_token(user_id: &str) -> String {
    sign_claims(&claims_for(user_id, Some(ADMIN_ROLE), 3600))
}

/// A correctly signed token that expired an hour ago.
#[must_use]
pub fn expired_token(user_id: &str) -> String {
    sign_claims(&claims_for(user_id, None, -3600))
}

/// Cookie header value carrying a session token and any extra cookies.
#[must_use]
pub fn cookie_header(token: Option<&str>, extra: &[String]) -> String {
    token
        .map(|t| format!("{SESSION_TOKEN_COOKIE}={t}"))
        .into_iter()
        .chain(extra.iter().cloned())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Send a GET request, optionally signed in.
pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    get_with_cookies(app, uri, token, &[]).await
}

/// Send a GET request with a session token and extra cookies.
pub async fn get_with_cookies(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    cookies: &[String],
) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    let cookie = cookie_header(token, cookies);
    if !cookie.is_empty() {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Send a URL-encoded form POST, optionally signed in.
pub async fn post_form(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    cookies: &[String],
    form: &[(&str, &str)],
) -> Response<Body> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish();

    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    let cookie = cookie_header(token, cookies);
    if !cookie.is_empty() {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `name=value` pairs from every `Set-Cookie` header, attributes dropped.
#[must_use]
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(|pair| pair.trim().to_string())
        .collect()
}
