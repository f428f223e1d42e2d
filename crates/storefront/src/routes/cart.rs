//! Cart and checkout route handlers.
//!
//! The cart lives in the session as product slugs with quantities and is
//! resolved against the catalog on every render, so prices are always
//! current. Lines whose product has disappeared are dropped from view.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tenantmart_core::{Price, Product};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::Cart;
use crate::routes::Layout;
use crate::routes::products::{find_product, load_or_empty};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub slug: String,
    pub name: String,
    pub href: String,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Resolve session cart lines against the catalog.
    #[must_use]
    pub fn build(cart: &Cart, products: &[Product]) -> Self {
        let mut subtotal = Decimal::ZERO;
        let mut item_count = 0;
        let mut items = Vec::with_capacity(cart.lines().len());

        for line in cart.lines() {
            let Some(product) = products
                .iter()
                .find(|p| p.slug == line.slug || p.id == line.slug)
            else {
                tracing::debug!(slug = %line.slug, "Cart line references unknown product");
                continue;
            };

            let line_total = product.price * Decimal::from(line.quantity);
            subtotal += line_total;
            item_count += line.quantity;
            items.push(CartItemView {
                slug: line.slug.clone(),
                name: product.name.clone(),
                href: format!("/products/{}", line.slug),
                image_url: product.image_url.clone(),
                quantity: line.quantity,
                price: product.unit_price().display(),
                line_price: Price::usd(line_total).display(),
            });
        }

        Self {
            items,
            subtotal: Price::usd(subtotal).display(),
            item_count,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    pub quantity: Option<String>,
}

/// Remove-from-cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub slug: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/checkout.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub email: String,
    pub full_name: String,
}

async fn load_cart_view(state: &AppState, session: &Session) -> Result<CartView> {
    let cart = Cart::load(session).await?;
    if cart.is_empty() {
        return Ok(CartView::build(&cart, &[]));
    }
    let products = load_or_empty(state.catalog().all_products()).await;
    Ok(CartView::build(&cart, &products))
}

/// Display cart page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
) -> Result<impl IntoResponse> {
    Ok(CartTemplate {
        layout: Layout::new(Some(&user), &state),
        cart: load_cart_view(&state, &session).await?,
    })
}

/// Add a product to the cart.
#[instrument(skip_all, fields(slug = %form.slug))]
pub async fn add(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = find_product(state.catalog(), form.slug.trim())
        .await
        .ok_or_else(|| AppError::NotFound("that product".to_string()))?;

    if !product.in_stock || product.stock_quantity == Some(0) {
        return Err(AppError::BadRequest(format!("{} is out of stock", product.name)));
    }

    let quantity = form
        .quantity
        .as_deref()
        .and_then(|q| q.trim().parse::<u32>().ok())
        .unwrap_or(1);

    let mut cart = Cart::load(&session).await?;
    cart.add(form.slug.trim(), quantity);
    cart.save(&session).await?;

    tracing::info!(slug = %form.slug, quantity, "Added to cart");
    Ok(Redirect::to("/cart"))
}

/// Remove a product from the cart.
#[instrument(skip_all, fields(slug = %form.slug))]
pub async fn remove(
    RequireUser(_user): RequireUser,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    let mut cart = Cart::load(&session).await?;
    if cart.remove(form.slug.trim()) {
        cart.save(&session).await?;
    }
    Ok(Redirect::to("/cart"))
}

/// Display the checkout form with a cart summary.
///
/// Payment is handled by an external provider; the form only collects
/// shipping details.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
) -> Result<impl IntoResponse> {
    let cart = load_cart_view(&state, &session).await?;

    Ok(CheckoutTemplate {
        layout: Layout::new(Some(&user), &state),
        email: user.email.as_ref().map(ToString::to_string).unwrap_or_default(),
        full_name: [user.first_name.as_deref(), user.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" "),
        cart,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn products() -> Vec<Product> {
        serde_json::from_str(
            r#"[
                {"_id": "a", "name": "Mug", "slug": "mug", "price": 12.5},
                {"_id": "b", "name": "Lamp", "slug": "lamp", "price": 40}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::default();
        cart.add("mug", 2);
        cart.add("lamp", 1);

        let view = CartView::build(&cart, &products());
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].line_price, "$25.00");
        assert_eq!(view.subtotal, "$65.00");
        assert_eq!(view.item_count, 3);
    }

    #[test]
    fn test_cart_view_skips_vanished_products() {
        let mut cart = Cart::default();
        cart.add("discontinued", 3);
        cart.add("lamp", 1);

        let view = CartView::build(&cart, &products());
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.subtotal, "$40.00");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::build(&Cart::default(), &products());
        assert!(view.is_empty());
        assert_eq!(view.subtotal, "$0.00");
    }
}
