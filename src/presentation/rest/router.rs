use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::application::ports::QuoteSource;
use crate::presentation::websocket::QuoteBroadcaster;

/// Application state shared across REST handlers.
pub struct AppState {
    pub source: Arc<dyn QuoteSource>,
    pub broadcaster: Arc<QuoteBroadcaster>,
}

impl AppState {
    pub fn new(source: Arc<dyn QuoteSource>, broadcaster: Arc<QuoteBroadcaster>) -> Self {
        AppState {
            source,
            broadcaster,
        }
    }
}

/// Create the REST API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/stocks", get(handlers::list_stocks))
        .route("/api/stocks/search", get(handlers::search_stocks))
        .route("/api/stocks/{symbol}", get(handlers::stock_details))
        .route("/health", get(handlers::health))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
