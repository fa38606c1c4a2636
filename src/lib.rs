//! Minimal JSON HTTP service for container liveness checks.
//!
//! Serves a handful of near-static endpoints that orchestration systems
//! (ECS task health checks, load balancer probes) and operators poke at:
//!
//! ```text
//! GET  /health    {status, timestamp, uptime}
//! GET  /secret    {secret}
//! GET  /          {message, app, environment, version}
//! GET  /api/info  {app, environment, port, nodeVersion, platform, memory}
//! POST /api/echo  {message, received, timestamp}
//! GET  /metrics   Prometheus text exposition
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Request metrics and Prometheus recorder
//! - [`runtime`]: Process memory and platform figures
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, Result, ServiceError};
