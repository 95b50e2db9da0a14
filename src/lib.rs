//! Geogate - a minimal HTTP API gateway for geocoding lookups.
//!
//! Geogate forwards a free-text search query to a single upstream
//! geocoding provider and returns the provider's response untouched. The
//! interesting part is the request pipeline: routes and cross-cutting
//! middleware are declared as ordered stage lists and wired by one
//! composition function, and every failure funnels through a single
//! error-resolution policy that separates caller faults (4xx, message
//! exposed verbatim) from system faults (500, detail gated by deployment
//! mode).
//!
//! # Quick Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use geogate::{OpenCageAdapter, SearchService, adapters::build_router, config::AppConfig};
//!
//! # fn main() -> eyre::Result<()> {
//! let cfg = AppConfig::default();
//! let geocoder = Arc::new(OpenCageAdapter::new(&cfg.geocoder)?);
//! let app = build_router(cfg.mode, Arc::new(SearchService::new(geocoder)));
//! // Hand `app` to axum::serve (see the binary crate).
//! # Ok(()) }
//! ```
//!
//! # Architecture
//! The crate separates **ports** (traits) from **adapters**
//! (implementations) while keeping business logic inside `core`. The core
//! never touches transport types, so handler chains and the resolution
//! policy are unit testable without a listener.
//!
//! # Error Handling
//! All fallible APIs return `eyre::Result<T>` or a domain specific error
//! type. Request-level failures are the closed taxonomy in
//! [`core::error::ApiError`].
pub mod config;
pub mod tracing_setup;

pub mod adapters;
pub mod core;
pub mod ports;

// Re-export the specific types needed by the binary crate
pub use crate::{
    adapters::{OpenCageAdapter, build_router},
    core::{ApiError, Places, SearchService},
    ports::geocoder::Geocoder,
};
