use std::sync::Arc;

use crate::application::ports::{QuoteFilter, QuoteSource, QuoteSourceError};
use crate::domain::Quote;

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct ListQuotesQuery {
    pub exchange: Option<String>,
    /// Comma-separated symbol list, as it arrives on the query string.
    pub symbols: Option<String>,
    pub limit: Option<usize>,
}

pub struct ListQuotesUseCase {
    source: Arc<dyn QuoteSource>,
}

impl ListQuotesUseCase {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    pub async fn execute(&self, query: ListQuotesQuery) -> Result<Vec<Quote>, ListQuotesError> {
        let exchange = super::parse_exchange(query.exchange.as_deref())
            .map_err(ListQuotesError::InvalidExchange)?;

        let symbols = query.symbols.map(|csv| {
            csv.split(',')
                .map(|s| s.trim().to_ascii_uppercase())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        });

        let filter = QuoteFilter {
            exchange,
            symbols,
            limit: Some(query.limit.unwrap_or(DEFAULT_LIMIT)),
        };

        self.source
            .quotes(filter)
            .await
            .map_err(ListQuotesError::Source)
    }
}

#[derive(Debug, Clone)]
pub enum ListQuotesError {
    InvalidExchange(String),
    Source(QuoteSourceError),
}

impl std::fmt::Display for ListQuotesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListQuotesError::InvalidExchange(s) => write!(f, "Invalid exchange: {}", s),
            ListQuotesError::Source(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ListQuotesError {}
