//! SparkNest intake server
//!
//! Hosts the single submission endpoint the public site posts to, plus the
//! pieces the operator binary needs.
//!
//! # Overview
//!
//! - [`config`]: TOML configuration with `INTAKE_*` environment overrides
//! - [`routes`]: warp filters for the endpoint, CORS and JSON rejections
//! - [`server`]: store opening, notification wiring and graceful shutdown
//! - [`telemetry`]: tracing subscriber setup
//!
//! # Example
//!
//! ```
//! use intake_server::{IntakeConfig, IntakeServer};
//! use intake_store::IntakeStore;
//! use std::sync::Arc;
//!
//! let config = IntakeConfig::default().with_notifications(false);
//! let server = IntakeServer::with_store(config, Arc::new(IntakeStore::open_in_memory().unwrap()));
//! assert_eq!(server.config().server.route, "contact-handler");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod routes;
pub mod server;
pub mod telemetry;

pub use config::{ConfigError, IntakeConfig};
pub use server::{shutdown_signal, IntakeServer, ServerError};
pub use telemetry::init_tracing;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
