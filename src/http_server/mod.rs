//! # HTTP Server Module
//!
//! Axum API over the leadership hierarchy engine.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/senapoti/*` - Promote, demote, remove-role, transfer, and queries
//! - `/observability/*` - Health and metrics

pub mod config;
pub mod errors;
pub mod observability_routes;
pub mod senapoti_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ErrorResponse};
pub use senapoti_routes::{SenapotiState, ACTOR_HEADER};
pub use server::HttpServer;
