use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use crate::application::{
    ListQuotesError, ListQuotesQuery, ListQuotesUseCase, QuoteDetailError, QuoteDetailUseCase,
    SearchQuotesError, SearchQuotesUseCase,
};
use crate::domain::{Quote, QuoteDetail, QuoteSummary};

use super::dto::{ApiResponse, DetailQuery, HealthResponse, ListQuery, SearchQuery};
use super::error::ApiError;
use super::router::AppState;

/// GET /api/stocks
pub async fn list_stocks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Quote>>>, ApiError> {
    let use_case = ListQuotesUseCase::new(Arc::clone(&state.source));

    let quotes = use_case
        .execute(ListQuotesQuery {
            exchange: query.exchange,
            symbols: query.symbols,
            limit: query.limit,
        })
        .await
        .map_err(|e| match e {
            ListQuotesError::InvalidExchange(s) => {
                ApiError::bad_request("Invalid exchange", format!("Unknown exchange: {}", s))
            }
            ListQuotesError::Source(e) => {
                ApiError::internal("Failed to fetch stock data", e.to_string())
            }
        })?;

    Ok(Json(ApiResponse::ok(quotes)))
}

/// GET /api/stocks/search
pub async fn search_stocks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<QuoteSummary>>>, ApiError> {
    let use_case = SearchQuotesUseCase::new(Arc::clone(&state.source));

    let results = use_case
        .execute(
            query.query.as_deref(),
            query.exchange.as_deref(),
            query.limit,
        )
        .await
        .map_err(|e| match e {
            SearchQuotesError::MissingQuery => ApiError::missing_parameter("Search query"),
            SearchQuotesError::InvalidExchange(s) => {
                ApiError::bad_request("Invalid exchange", format!("Unknown exchange: {}", s))
            }
            SearchQuotesError::Source(e) => {
                ApiError::internal("Failed to search stocks", e.to_string())
            }
        })?;

    Ok(Json(ApiResponse::ok(results)))
}

/// GET /api/stocks/{symbol}
pub async fn stock_details(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<ApiResponse<QuoteDetail>>, ApiError> {
    let use_case = QuoteDetailUseCase::new(Arc::clone(&state.source));

    let detail = use_case
        .execute(&symbol, query.exchange.as_deref())
        .await
        .map_err(|e| match e {
            QuoteDetailError::InvalidExchange(s) => {
                ApiError::bad_request("Invalid exchange", format!("Unknown exchange: {}", s))
            }
            QuoteDetailError::NotFound(s) => ApiError::not_found(
                "Stock not found",
                format!("Stock with symbol {} not found", s),
            ),
            QuoteDetailError::Source(e) => {
                ApiError::internal("Failed to fetch stock details", e.to_string())
            }
        })?;

    Ok(Json(ApiResponse::ok(detail)))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.broadcaster.connected_count()))
}
