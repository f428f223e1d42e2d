//! Core types for Tenantmart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod slug;
pub mod status;
pub mod tenant;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::Order;
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use slug::{Slug, SlugError};
pub use status::*;
pub use tenant::Tenant;
