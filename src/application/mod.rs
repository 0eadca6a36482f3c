pub mod ports;
pub mod use_cases;

pub use ports::{QuoteFilter, QuoteSource, QuoteSourceError};
pub use use_cases::{
    ListQuotesError, ListQuotesQuery, ListQuotesUseCase, QuoteDetailError, QuoteDetailUseCase,
    SearchQuotesError, SearchQuotesUseCase,
};
