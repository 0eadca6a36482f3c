use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange venue a quote is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Venue {
    Nse,
    Bse,
}

impl Venue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::Nse => "NSE",
            Venue::Bse => "BSE",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Venue {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "NSE" => Ok(Venue::Nse),
            "BSE" => Ok(Venue::Bse),
            _ => Err("unknown exchange (expected NSE or BSE)"),
        }
    }
}

/// Market quote for a single listed equity.
///
/// `change` and `p_change` are derived from `ltp` and `close`; use
/// [`Quote::reprice`] to move the last traded price so the derived fields
/// stay consistent (rounded to 2 decimal places at emission).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub exchange: Venue,
    pub company_name: String,
    /// Last traded price.
    pub ltp: Decimal,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    /// Previous session close.
    pub close: Decimal,
    pub change: Decimal,
    pub p_change: Decimal,
    pub volume: u64,
    pub avg_price: Decimal,
    pub market_cap: u64,
    pub pe: Decimal,
    pub pb: Decimal,
    pub dividend: Decimal,
    pub sector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Quote {
    /// Move the last traded price and recompute the derived fields.
    pub fn reprice(&mut self, ltp: Decimal, at: DateTime<Utc>) {
        self.ltp = ltp.round_dp(2);
        self.recompute_derived();
        self.last_updated = Some(at);
    }

    /// Recompute `change`/`p_change` from `ltp` and `close`, 2 dp.
    pub fn recompute_derived(&mut self) {
        self.change = (self.ltp - self.close).round_dp(2);
        self.p_change = if self.close.is_zero() {
            Decimal::ZERO
        } else {
            (self.change / self.close * Decimal::ONE_HUNDRED).round_dp(2)
        };
    }
}

/// Compact projection of a quote used in search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub symbol: String,
    pub company_name: String,
    pub exchange: Venue,
    pub ltp: Decimal,
    pub change: Decimal,
    pub p_change: Decimal,
}

impl From<&Quote> for QuoteSummary {
    fn from(quote: &Quote) -> Self {
        QuoteSummary {
            symbol: quote.symbol.clone(),
            company_name: quote.company_name.clone(),
            exchange: quote.exchange,
            ltp: quote.ltp,
            change: quote.change,
            p_change: quote.p_change,
        }
    }
}

/// Extended fundamentals attached to a single-quote detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailExtras {
    pub week_high_52: Decimal,
    pub week_low_52: Decimal,
    pub eps: Decimal,
    pub book_value: Decimal,
    pub face_value: u32,
    pub market_lot: u32,
    pub isin: String,
    pub industry: String,
    pub listing_date: String,
    pub day_high: Decimal,
    pub day_low: Decimal,
    pub avg_volume: u64,
    pub total_shares: u64,
    pub free_float: Decimal,
}

/// A quote plus its extended fundamentals block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: Quote,
    pub additional_data: DetailExtras,
}
