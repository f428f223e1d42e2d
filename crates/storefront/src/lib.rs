//! Tenantmart storefront library.
//!
//! The binary in `main.rs` only loads configuration, wires up Sentry and
//! tracing, and serves [`app::router`]; everything else lives here so the
//! integration tests can drive the same router in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
