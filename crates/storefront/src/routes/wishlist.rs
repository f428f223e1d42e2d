//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::Wishlist;
use crate::routes::Layout;
use crate::routes::products::{ProductView, find_product, load_or_empty};
use crate::state::AppState;

/// Wishlist add/remove form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub slug: String,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist.html")]
pub struct WishlistTemplate {
    pub layout: Layout,
    pub products: Vec<ProductView>,
}

/// Display saved products.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
) -> Result<impl IntoResponse> {
    let wishlist = Wishlist::load(&session).await?;

    let products = if wishlist.slugs().is_empty() {
        Vec::new()
    } else {
        let catalog = load_or_empty(state.catalog().all_products()).await;
        wishlist
            .slugs()
            .iter()
            .filter_map(|slug| catalog.iter().find(|p| &p.slug == slug || &p.id == slug))
            .map(|p| ProductView::new(p, "/products"))
            .collect()
    };

    Ok(WishlistTemplate {
        layout: Layout::new(Some(&user), &state),
        products,
    })
}

/// Save a product to the wishlist.
#[instrument(skip_all, fields(slug = %form.slug))]
pub async fn add(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    session: Session,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect> {
    let slug = form.slug.trim();
    if find_product(state.catalog(), slug).await.is_none() {
        return Err(AppError::NotFound("that product".to_string()));
    }

    let mut wishlist = Wishlist::load(&session).await?;
    if wishlist.add(slug) {
        wishlist.save(&session).await?;
    }
    Ok(Redirect::to("/wishlist"))
}

/// Remove a product from the wishlist.
#[instrument(skip_all, fields(slug = %form.slug))]
pub async fn remove(
    RequireUser(_user): RequireUser,
    session: Session,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect> {
    let mut wishlist = Wishlist::load(&session).await?;
    if wishlist.remove(form.slug.trim()) {
        wishlist.save(&session).await?;
    }
    Ok(Redirect::to("/wishlist"))
}
