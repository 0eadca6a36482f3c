use std::sync::Arc;

use crate::application::ports::{QuoteSource, QuoteSourceError};
use crate::domain::{QuoteDetail, Venue};

pub struct QuoteDetailUseCase {
    source: Arc<dyn QuoteSource>,
}

impl QuoteDetailUseCase {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// Look up one symbol; the venue defaults to NSE when not given.
    pub async fn execute(
        &self,
        symbol: &str,
        exchange: Option<&str>,
    ) -> Result<QuoteDetail, QuoteDetailError> {
        let exchange = super::parse_exchange(exchange)
            .map_err(QuoteDetailError::InvalidExchange)?
            .unwrap_or(Venue::Nse);

        self.source
            .quote_detail(symbol, exchange)
            .await
            .map_err(QuoteDetailError::Source)?
            .ok_or_else(|| QuoteDetailError::NotFound(symbol.to_string()))
    }
}

#[derive(Debug, Clone)]
pub enum QuoteDetailError {
    InvalidExchange(String),
    NotFound(String),
    Source(QuoteSourceError),
}

impl std::fmt::Display for QuoteDetailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteDetailError::InvalidExchange(s) => write!(f, "Invalid exchange: {}", s),
            QuoteDetailError::NotFound(s) => {
                write!(f, "Stock with symbol {} not found", s)
            }
            QuoteDetailError::Source(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for QuoteDetailError {}
