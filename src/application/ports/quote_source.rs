use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Quote, QuoteDetail, QuoteSummary, Snapshot, Venue};

/// Filters for listing quotes.
#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    pub exchange: Option<Venue>,
    pub symbols: Option<Vec<String>>,
    pub limit: Option<usize>,
}

/// Failure modes of the upstream quote feed.
#[derive(Debug, Clone, Error)]
pub enum QuoteSourceError {
    #[error("quote feed unavailable: {0}")]
    Unavailable(String),
    #[error("quote feed authentication failed: {0}")]
    Auth(String),
}

/// Upstream source of market quotes.
///
/// The broadcast core depends only on [`QuoteSource::snapshot`] and its
/// failure mode; the REST surface uses the remaining query methods. Any
/// error is recovered locally by the caller (a failed snapshot fetch skips
/// that publish tick).
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch one live-data snapshot, at most `limit` quotes.
    async fn snapshot(&self, limit: Option<usize>) -> Result<Snapshot, QuoteSourceError>;

    /// List quotes matching the filter.
    async fn quotes(&self, filter: QuoteFilter) -> Result<Vec<Quote>, QuoteSourceError>;

    /// Detail view for one symbol on one venue; `None` when unlisted.
    async fn quote_detail(
        &self,
        symbol: &str,
        exchange: Venue,
    ) -> Result<Option<QuoteDetail>, QuoteSourceError>;

    /// Substring search over symbol and company name.
    async fn search(
        &self,
        query: &str,
        exchange: Option<Venue>,
        limit: usize,
    ) -> Result<Vec<QuoteSummary>, QuoteSourceError>;
}
