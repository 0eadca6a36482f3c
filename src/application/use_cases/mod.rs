mod list_quotes;
mod quote_detail;
mod search_quotes;

use crate::domain::Venue;

/// Parse an optional `exchange` query parameter; `Err` carries the raw value.
fn parse_exchange(raw: Option<&str>) -> Result<Option<Venue>, String> {
    match raw {
        None => Ok(None),
        Some(s) => Venue::try_from(s).map(Some).map_err(|_| s.to_string()),
    }
}

pub use list_quotes::{ListQuotesError, ListQuotesQuery, ListQuotesUseCase};
pub use quote_detail::{QuoteDetailError, QuoteDetailUseCase};
pub use search_quotes::{SearchQuotesError, SearchQuotesUseCase};
