use std::sync::Arc;

use crate::application::ports::{QuoteSource, QuoteSourceError};
use crate::domain::QuoteSummary;

const DEFAULT_LIMIT: usize = 10;

pub struct SearchQuotesUseCase {
    source: Arc<dyn QuoteSource>,
}

impl SearchQuotesUseCase {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    pub async fn execute(
        &self,
        query: Option<&str>,
        exchange: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<QuoteSummary>, SearchQuotesError> {
        let query = match query {
            Some(q) if !q.trim().is_empty() => q.trim(),
            _ => return Err(SearchQuotesError::MissingQuery),
        };

        let exchange =
            super::parse_exchange(exchange).map_err(SearchQuotesError::InvalidExchange)?;

        self.source
            .search(query, exchange, limit.unwrap_or(DEFAULT_LIMIT))
            .await
            .map_err(SearchQuotesError::Source)
    }
}

#[derive(Debug, Clone)]
pub enum SearchQuotesError {
    MissingQuery,
    InvalidExchange(String),
    Source(QuoteSourceError),
}

impl std::fmt::Display for SearchQuotesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchQuotesError::MissingQuery => write!(f, "Search query is required"),
            SearchQuotesError::InvalidExchange(s) => write!(f, "Invalid exchange: {}", s),
            SearchQuotesError::Source(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SearchQuotesError {}
