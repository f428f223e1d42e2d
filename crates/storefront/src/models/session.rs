//! Session-stored shopping state.
//!
//! Identity never lives in the session; it comes from the provider's token.
//! The session holds only the cart and wishlist.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session keys for shopping state.
pub mod keys {
    /// Key for the cart lines.
    pub const CART: &str = "cart";

    /// Key for the wishlist slugs.
    pub const WISHLIST: &str = "wishlist";
}

/// Most units of one product a cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub slug: String,
    pub quantity: u32,
}

/// Session cart: product slugs with quantities, in the order first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add units of a product, merging with an existing line.
    ///
    /// Quantities are clamped to `1..=MAX_LINE_QUANTITY`.
    pub fn add(&mut self, slug: &str, quantity: u32) {
        let quantity = quantity.clamp(1, MAX_LINE_QUANTITY);
        if let Some(line) = self.lines.iter_mut().find(|line| line.slug == slug) {
            line.quantity = line.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY);
        } else {
            self.lines.push(CartLine {
                slug: slug.to_string(),
                quantity,
            });
        }
    }

    /// Drop a product's line. Returns whether anything was removed.
    pub fn remove(&mut self, slug: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.slug != slug);
        self.lines.len() != before
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Load the cart from the session (empty when absent).
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(session.get(keys::CART).await?.unwrap_or_default())
    }

    /// Write the cart back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::CART, self).await
    }
}

/// Session wishlist: product slugs, most recently added first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    slugs: Vec<String>,
}

impl Wishlist {
    /// Save a product. Returns `false` if it was already saved.
    pub fn add(&mut self, slug: &str) -> bool {
        if self.contains(slug) {
            return false;
        }
        self.slugs.insert(0, slug.to_string());
        true
    }

    /// Forget a product. Returns whether it was saved.
    pub fn remove(&mut self, slug: &str) -> bool {
        let before = self.slugs.len();
        self.slugs.retain(|saved| saved != slug);
        self.slugs.len() != before
    }

    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.iter().any(|saved| saved == slug)
    }

    #[must_use]
    pub fn slugs(&self) -> &[String] {
        &self.slugs
    }

    /// Load the wishlist from the session (empty when absent).
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(session.get(keys::WISHLIST).await?.unwrap_or_default())
    }

    /// Write the wishlist back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::WISHLIST, self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_add_merges_lines() {
        let mut cart = Cart::default();
        cart.add("mug", 1);
        cart.add("lamp", 2);
        cart.add("mug", 3);

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0], CartLine { slug: "mug".to_string(), quantity: 4 });
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_cart_quantity_clamped() {
        let mut cart = Cart::default();
        cart.add("mug", 0);
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.add("mug", 500);
        assert_eq!(cart.lines()[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_cart_remove() {
        let mut cart = Cart::default();
        cart.add("mug", 1);
        assert!(cart.remove("mug"));
        assert!(!cart.remove("mug"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_wishlist_dedupes_and_orders_newest_first() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.add("mug"));
        assert!(wishlist.add("lamp"));
        assert!(!wishlist.add("mug"));

        assert_eq!(wishlist.slugs(), ["lamp".to_string(), "mug".to_string()]);
        assert!(wishlist.remove("mug"));
        assert!(!wishlist.contains("mug"));
    }
}
