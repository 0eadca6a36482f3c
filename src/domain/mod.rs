pub mod quote;
pub mod snapshot;

pub use quote::{DetailExtras, Quote, QuoteDetail, QuoteSummary, Venue};
pub use snapshot::Snapshot;
