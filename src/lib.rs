//! Sitehost front door
//!
//! Composition layer over the ingestion and serving crates: configuration, metrics, the
//! HTTP router and the `sitehost` command line.

pub mod cli;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod server;

pub use config::{Config, IngestConfig, RoutingConfig, ServerConfig};
pub use errors::ApiError;
pub use server::{build_router, AuthPolicy, NamespaceLocks, ServeState};
