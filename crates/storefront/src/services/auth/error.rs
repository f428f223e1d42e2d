//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while verifying provider session tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The configured public key could not be parsed.
    #[error("invalid session public key: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),

    /// Signature, expiry, issuer or shape check failed.
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The token was minted for an origin outside the allow-list.
    #[error("session token issued for unauthorized party {0}")]
    UnauthorizedParty(String),
}
