//! Quotecast
//!
//! A live market-quote streaming server: many WebSocket viewers receive
//! periodically refreshed quote snapshots from one shared publish loop,
//! alongside a small REST API over the same quote universe.
//!
//! # Architecture
//!
//! The crate follows Clean Architecture with clear separation of concerns:
//!
//! - **Domain**: quote and snapshot types with their derived-field rules
//! - **Application**: the `QuoteSource` port and the REST use cases
//! - **Infrastructure**: the simulated feed and configuration loading
//! - **Presentation**: REST handlers and the WebSocket broadcast core
//!   (connection registry, publish loop, per-connection delivery)
//!
//! # Example
//!
//! ```ignore
//! use quotecast::{AppConfig, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::new(AppConfig::default());
//!     server.run().await.unwrap();
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types
pub use domain::{DetailExtras, Quote, QuoteDetail, QuoteSummary, Snapshot, Venue};

pub use application::{QuoteFilter, QuoteSource, QuoteSourceError};

pub use infrastructure::{AppConfig, ConfigError, SimulatedFeed};

pub use presentation::{
    ApiError, AppState, QuoteBroadcaster, WsState, create_router, ws_handler,
};

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// The quote streaming server.
pub struct Server {
    pub config: AppConfig,
    source: Arc<dyn QuoteSource>,
    broadcaster: Arc<QuoteBroadcaster>,
}

impl Server {
    /// Create a server backed by the simulated quote feed.
    pub fn new(config: AppConfig) -> Self {
        Self::with_source(config, Arc::new(SimulatedFeed::new()))
    }

    /// Create a server over a custom quote source.
    pub fn with_source(config: AppConfig, source: Arc<dyn QuoteSource>) -> Self {
        let broadcaster = Arc::new(QuoteBroadcaster::new(
            Arc::clone(&source),
            Duration::from_millis(config.stream.interval_ms),
            config.stream.snapshot_limit,
        ));

        Server {
            config,
            source,
            broadcaster,
        }
    }

    pub fn broadcaster(&self) -> &Arc<QuoteBroadcaster> {
        &self.broadcaster
    }

    /// Build the combined REST + WebSocket router.
    pub fn router(&self) -> Router {
        let state = Arc::new(AppState::new(
            Arc::clone(&self.source),
            Arc::clone(&self.broadcaster),
        ));

        let ws_state = Arc::new(WsState {
            broadcaster: Arc::clone(&self.broadcaster),
            channel_capacity: self.config.stream.channel_capacity,
        });

        create_router(state).route(
            "/ws",
            axum::routing::get({
                let ws_state = Arc::clone(&ws_state);
                move |ws| ws_handler(ws, axum::extract::State(ws_state))
            }),
        )
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let router = self.router();

        tracing::info!("quotecast listening on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
