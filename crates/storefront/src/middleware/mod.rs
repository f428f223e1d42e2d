//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (binary only)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span)
//! 4. Security headers (CSP, frame and referrer policy)
//! 5. Session layer (cart and wishlist)
//! 6. Auth gate (session token verification, public route list)

pub mod auth;
pub mod request_id;
pub mod route_matcher;
pub mod security_headers;
pub mod session;
pub mod tenant;

pub use auth::{AuthRejection, OptionalUser, RequireAdmin, RequireUser, auth_gate, sign_in_path};
pub use request_id::request_id_middleware;
pub use route_matcher::{PUBLIC_ROUTES, RouteMatcher};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use tenant::CurrentTenant;
