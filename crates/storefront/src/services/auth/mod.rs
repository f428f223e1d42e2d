//! Session verification for the hosted identity provider.
//!
//! The provider signs a short-lived RS256 JWT and stores it in the
//! `__session` cookie (API clients may send it as a bearer token instead).
//! Verifying it is the only identity check the storefront performs; no
//! identity is kept in the server-side session.

mod error;

pub use error::AuthError;

use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tower_sessions::cookie::Cookie;

use tenantmart_core::Email;

use crate::config::AuthConfig;

/// Cookie the identity provider stores its session token in.
pub const SESSION_TOKEN_COOKIE: &str = "__session";

/// Clock skew tolerated on `exp` and `nbf`.
const LEEWAY_SECONDS: u64 = 5;

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    sid: Option<String>,
    #[serde(default)]
    azp: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    metadata: Option<ClaimsMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct ClaimsMetadata {
    #[serde(default)]
    role: Option<String>,
}

/// Identity of a verified visitor, taken from session token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub session_id: Option<String>,
    pub email: Option<Email>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

impl SessionUser {
    /// Full name, falling back to email and then the provider user ID.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !name.is_empty() {
            return name;
        }
        self.email
            .as_ref()
            .map_or_else(|| self.user_id.clone(), ToString::to_string)
    }

    /// Whether the user carries the given role claim.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

impl From<SessionClaims> for SessionUser {
    fn from(claims: SessionClaims) -> Self {
        // Top-level `role` wins over `metadata.role`
        let role = claims
            .role
            .or_else(|| claims.metadata.and_then(|m| m.role));

        // A malformed email claim is dropped rather than failing sign-in
        let email = claims.email.and_then(|raw| match Email::parse(&raw) {
            Ok(email) => Some(email),
            Err(e) => {
                tracing::warn!(user_id = %claims.sub, error = %e, "Ignoring invalid email claim");
                None
            }
        });

        Self {
            user_id: claims.sub,
            session_id: claims.sid,
            email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            role,
        }
    }
}

/// Verifies provider session tokens against the configured public key.
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
    authorized_parties: Vec<String>,
}

impl SessionVerifier {
    /// Build a verifier from auth configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidKey` if the PEM is not an RSA public key.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let key =
            DecodingKey::from_rsa_pem(config.jwt_public_key.as_bytes()).map_err(AuthError::InvalidKey)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = LEEWAY_SECONDS;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self {
            key,
            validation,
            authorized_parties: config.authorized_parties.clone(),
        })
    }

    /// Verify a raw token and map its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the signature, timing or issuer
    /// checks fail and `AuthError::UnauthorizedParty` if `azp` is present but
    /// not allow-listed.
    pub fn verify(&self, token: &str) -> Result<SessionUser, AuthError> {
        let claims = decode::<SessionClaims>(token, &self.key, &self.validation)?.claims;

        if !self.authorized_parties.is_empty()
            && let Some(azp) = &claims.azp
            && !self.authorized_parties.iter().any(|party| party == azp)
        {
            return Err(AuthError::UnauthorizedParty(azp.clone()));
        }

        Ok(SessionUser::from(claims))
    }

    /// Verify whatever session token the request carries.
    ///
    /// Returns `None` when no token is present or it fails verification.
    pub fn authenticate(&self, headers: &HeaderMap) -> Option<SessionUser> {
        let token = session_token(headers)?;
        match self.verify(&token) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
                None
            }
        }
    }
}

/// The session token from the `__session` cookie, else an `Authorization: Bearer` header.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from)
    })
}
