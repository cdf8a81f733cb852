//! # HTTP Server
//!
//! Combines the hierarchy and observability routers behind one listener.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::observability_routes::{health_routes, observability_routes};
use super::senapoti_routes::{senapoti_routes, SenapotiState};
use crate::observability::{Event, Logger};

/// HTTP server for the leadership hierarchy API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server around an engine-backed state
    pub fn with_config(config: HttpServerConfig, state: Arc<SenapotiState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, state: Arc<SenapotiState>) -> Router {
        let metrics = Arc::clone(state.engine.metrics());

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.allowed_origins()))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .nest("/api/senapoti", senapoti_routes(state))
            .nest("/observability", observability_routes(metrics))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the listener fails
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid socket address: {}", self.config.socket_addr()),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;

        let bound = addr.to_string();
        Logger::info(
            Event::Serving.as_str(),
            &[("addr", bound.as_str()), ("api_prefix", "/api/senapoti")],
        );

        axum::serve(listener, self.router).await
    }
}
