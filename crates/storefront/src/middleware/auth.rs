//! Authentication gate and extractors.
//!
//! `auth_gate` verifies the provider session token on every request, places
//! the resulting [`SessionUser`] in request extensions and turns away
//! signed-out visitors from non-public paths. The extractors read what the
//! gate stored.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, Uri, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use tenantmart_core::Email;

use crate::error::set_sentry_user;
use crate::services::SessionUser;
use crate::state::AppState;

/// Sign-in page path carrying where to return afterwards.
#[must_use]
pub fn sign_in_path(return_to: &str) -> String {
    format!("/sign-in?redirect_url={}", urlencoding::encode(return_to))
}

/// Middleware that enforces the public route list.
///
/// HTML requests without a valid session are redirected to sign-in;
/// `/api/` requests get 401.
pub async fn auth_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let user = state.verifier().authenticate(request.headers());

    match user {
        Some(user) => {
            set_sentry_user(&user.user_id, user.email.as_ref().map(Email::as_str));
            tracing::Span::current().record("user_id", user.user_id.as_str());
            request.extensions_mut().insert(user);
        }
        None if !state.public_routes().matches(request.uri().path()) => {
            tracing::debug!(path = %request.uri().path(), "Signed-out request to protected path");
            return AuthRejection::for_uri(request.uri()).into_response();
        }
        None => {}
    }

    next.run(request).await
}

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.display_name())
/// }
/// ```
pub struct RequireUser(pub SessionUser);

/// Error returned when a handler's access requirement is not met.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// Redirect to sign-in, then back to the given path (for HTML requests).
    RedirectToSignIn(String),
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Signed in but lacking the required role.
    Forbidden,
}

impl AuthRejection {
    /// The rejection for a signed-out request to `uri`.
    #[must_use]
    pub fn for_uri(uri: &Uri) -> Self {
        let path = uri.path();
        if path == "/api" || path.starts_with("/api/") {
            return Self::Unauthorized;
        }
        let return_to = uri.path_and_query().map_or(path, |pq| pq.as_str());
        Self::RedirectToSignIn(return_to.to_string())
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn(return_to) => Redirect::to(&sign_in_path(&return_to)).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => Redirect::to("/").into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AuthRejection::for_uri(&parts.uri))
    }
}

/// Extractor that optionally gets the signed-in user.
///
/// Unlike `RequireUser`, this never rejects the request.
pub struct OptionalUser(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<SessionUser>().cloned()))
    }
}

/// Extractor that requires a signed-in user holding the admin role.
///
/// Signed-out visitors are sent to sign-in; other users are sent home.
pub struct RequireAdmin(pub SessionUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if user.has_role(&state.config().auth.admin_role) {
            Ok(Self(user))
        } else {
            tracing::warn!(user_id = %user.user_id, path = %parts.uri.path(), "Non-admin denied admin page");
            Err(AuthRejection::Forbidden)
        }
    }
}
