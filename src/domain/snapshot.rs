use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::Quote;

/// One immutable batch of quotes produced by a single fetch.
///
/// A snapshot is produced once per publish tick and shared verbatim across
/// every recipient of that tick; it is never regenerated per recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    quotes: Vec<Quote>,
    generated_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(quotes: Vec<Quote>, generated_at: DateTime<Utc>) -> Self {
        Snapshot {
            quotes,
            generated_at,
        }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Wire timestamp: ISO-8601 with millisecond precision, UTC (`Z`).
    pub fn timestamp_rfc3339(&self) -> String {
        self.generated_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
