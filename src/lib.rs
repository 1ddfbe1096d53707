//! Correlation id propagation for `tower` / `axum` HTTP services.
//!
//! For every inbound request the middleware makes sure a correlation id
//! exists: it takes the value of a configurable request header when the
//! client sent one, otherwise generates a fresh id (or rejects the request
//! with `400` in strict mode). The id is bound to the request extensions,
//! where handlers and instrumentation read it back, and is optionally
//! echoed in the response header.
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use correlation_id::{CorrelationId, CorrelationIdOptions};
//!
//! async fn handler(id: CorrelationId) -> String {
//!     id.to_string()
//! }
//!
//! # fn build() -> Result<Router, correlation_id::error::CorrelationIdError> {
//! let layer = CorrelationIdOptions::new()
//!     .with_header_name("X-Correlation-Id")
//!     .into_layer()?;
//! let app: Router = Router::new().route("/", get(handler)).layer(layer);
//! # Ok(app)
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`middleware`] -- [`CorrelationIdLayer`] and its service, configured by
//!   [`CorrelationIdOptions`].
//! - [`context`] -- Binding and reading the id in request extensions, plus
//!   the [`CorrelationId`] extractor.
//! - [`generator`] -- Id generation strategies (random UUID v4 by default).
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`config`] -- Config file model, loading and validation for the demo
//!   server.
//! - [`cli`], [`cmd`], [`logging`], [`server`] -- The demo binary: clap
//!   parsing, subcommands, tracing setup and the Axum router.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |

#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod logging;
pub mod middleware;
pub mod server;

pub use context::{correlation_id, with_correlation_id, CorrelationId, CorrelationIdExt};
pub use middleware::{
    CorrelationIdLayer, CorrelationIdOptions, CorrelationIdService, DEFAULT_HEADER_NAME,
};
