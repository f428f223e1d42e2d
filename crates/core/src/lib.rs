//! Tenantmart Core - Shared types library.
//!
//! This crate provides common types used across all Tenantmart components:
//! - `storefront` - Public-facing multi-tenant storefront and admin panel
//! - `cli` - Command-line tools for migrations and tenant management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, slugs, emails, prices, and the domain records
//! - [`catalog`] - Catalog view derivation (filter, sort, paginate)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use types::*;
