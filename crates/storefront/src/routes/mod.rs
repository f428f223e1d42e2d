//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Landing page (or a custom-domain store)
//! GET  /sign-in, /sign-up             - Redirect to the hosted auth pages
//!
//! # Catalog (public)
//! GET  /products                      - Catalog with filters, sort and pagination
//! GET  /products/{slug}               - Product detail
//!
//! # Shopping (requires sign-in)
//! GET  /cart                          - Cart page
//! POST /cart/add                      - Add to cart, redirect to /cart
//! POST /cart/remove                   - Remove from cart, redirect to /cart
//! GET  /checkout                      - Checkout form with cart summary
//! GET  /wishlist                      - Saved products
//! POST /wishlist/add                  - Save a product
//! POST /wishlist/remove               - Forget a product
//!
//! # Account (requires sign-in)
//! GET  /orders                        - Order history
//! GET  /orders/{id}                   - Order detail
//! GET  /profile                       - Profile from session claims
//! GET  /dashboard                     - Account overview
//!
//! # Admin (requires admin role)
//! GET  /admin                         - Redirect to /admin/dashboard
//! GET  /admin/dashboard               - Store-wide totals
//! GET  /admin/products                - Product listing
//! GET  /admin/orders                  - Recent orders
//! GET  /admin/users                   - Customers who have ordered
//!
//! # Tenant stores (requires sign-in)
//! GET  /{store_slug}                  - Store landing
//! GET  /{store_slug}/products         - Store catalog
//! GET  /{store_slug}/products/{slug}  - Store product detail
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod home;
pub mod orders;
pub mod products;
pub mod stores;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use tenantmart_core::Tenant;

use crate::services::SessionUser;
use crate::state::AppState;

/// Page chrome shared by every template: who is signed in and which
/// navigation to show.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub signed_in: bool,
    pub user_name: String,
    pub is_admin: bool,
    pub store: Option<StoreNav>,
    pub admin_section: bool,
}

/// Navigation context inside a tenant store.
#[derive(Debug, Clone)]
pub struct StoreNav {
    pub slug: String,
    pub name: String,
}

impl Layout {
    /// Chrome for the given (possibly signed-out) visitor.
    #[must_use]
    pub fn new(user: Option<&SessionUser>, state: &AppState) -> Self {
        user.map_or_else(Self::default, |user| Self {
            signed_in: true,
            user_name: user.display_name(),
            is_admin: user.has_role(&state.config().auth.admin_role),
            store: None,
            admin_section: false,
        })
    }

    /// Show the tenant's store navigation.
    #[must_use]
    pub fn in_store(mut self, tenant: &Tenant) -> Self {
        self.store = Some(StoreNav {
            slug: tenant.slug.to_string(),
            name: tenant.name.clone(),
        });
        self
    }

    /// Show the admin navigation.
    #[must_use]
    pub const fn in_admin(mut self) -> Self {
        self.admin_section = true;
        self
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/dashboard", get(admin::dashboard))
        .route("/products", get(admin::products))
        .route("/orders", get(admin::orders))
        .route("/users", get(admin::users))
}

/// Create the tenant store routes.
///
/// Merged rather than nested so the tenant extractor sees the full path.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/{store_slug}", get(stores::show))
        .route("/{store_slug}/products", get(stores::products))
        .route("/{store_slug}/products/{slug}", get(stores::product))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/sign-in", get(auth::sign_in))
        .route("/sign-up", get(auth::sign_up))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
        .nest("/wishlist", wishlist_routes())
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/profile", get(account::profile))
        .route("/dashboard", get(account::dashboard))
        .nest("/admin", admin_routes())
        .merge(store_routes())
}
