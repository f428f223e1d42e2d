//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before a sanitized response is sent; `NotFound`
//! renders the HTML not-found page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::content::ContentError;
use crate::db::RepositoryError;
use crate::filters;
use crate::routes::Layout;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Content platform request failed.
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Not-found page.
#[derive(Template, WebTemplate)]
#[template(path = "errors/not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
    pub message: String,
}

impl NotFoundTemplate {
    /// Not-found page for a signed-out visitor.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            layout: Layout::default(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::Content(_) | Self::Session(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Content(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        if status == StatusCode::NOT_FOUND {
            let message = match self {
                Self::NotFound(what) => format!("We couldn't find {what}."),
                _ => "We couldn't find that page.".to_string(),
            };
            return (status, NotFoundTemplate::new(message)).into_response();
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Content(_) => "External service error".to_string(),
            Self::BadRequest(_) => self.to_string(),
            _ => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Associate Sentry events on this request with the signed-in user.
pub fn set_sentry_user(user_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Content(ContentError::NotConfigured)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "test".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_page_mentions_resource() {
        let html = NotFoundTemplate::new("We couldn't find that store.")
            .render()
            .unwrap_or_default();
        assert!(html.contains("that store"));
    }
}
