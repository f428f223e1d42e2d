//! Domain models for storefront.

pub mod session;

pub use session::{Cart, CartLine, Wishlist, keys as session_keys};
