mod quote_source;

pub use quote_source::{QuoteFilter, QuoteSource, QuoteSourceError};
