//! Simulated quote feed.
//!
//! Stands in for a real brokerage market-data API: serves a fixed universe
//! of large-cap equities and applies a ±1% price jitter on every fetch, so
//! consecutive snapshots move the way a live feed would. Authentication is
//! a mocked session token established lazily on first use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use crate::application::ports::{QuoteFilter, QuoteSource, QuoteSourceError};
use crate::domain::{DetailExtras, Quote, QuoteDetail, QuoteSummary, Snapshot, Venue};

const DEFAULT_LIST_LIMIT: usize = 20;
const DEFAULT_SNAPSHOT_LIMIT: usize = 10;

/// In-process stand-in for the upstream quote feed.
pub struct SimulatedFeed {
    universe: Vec<Quote>,
    session_token: Mutex<Option<String>>,
}

impl SimulatedFeed {
    pub fn new() -> Self {
        SimulatedFeed {
            universe: seed_universe(),
            session_token: Mutex::new(None),
        }
    }

    /// Build a feed over a custom universe (used by tests).
    pub fn with_universe(universe: Vec<Quote>) -> Self {
        SimulatedFeed {
            universe,
            session_token: Mutex::new(None),
        }
    }

    /// Establish the mocked session on first use.
    fn ensure_session(&self) {
        let mut token = self.session_token.lock();
        if token.is_none() {
            let issued = format!("mock_access_token_{}", Utc::now().timestamp_millis());
            tracing::info!("authenticated with upstream quote feed");
            *token = Some(issued);
        }
    }

    /// Reprice a base quote with a uniform ±1% jitter around its seed ltp.
    fn jitter(&self, base: &Quote, at: DateTime<Utc>) -> Quote {
        let mut rng = rand::thread_rng();
        let basis_points: i64 = rng.gen_range(-100..=100);
        let factor = Decimal::ONE + Decimal::new(basis_points, 4);

        let mut quote = base.clone();
        quote.reprice((base.ltp * factor).round_dp(2), at);
        quote
    }

    fn filtered(&self, filter: &QuoteFilter) -> Vec<&Quote> {
        self.universe
            .iter()
            .filter(|q| filter.exchange.is_none_or(|venue| q.exchange == venue))
            .filter(|q| {
                filter
                    .symbols
                    .as_ref()
                    .is_none_or(|symbols| symbols.iter().any(|s| s == &q.symbol))
            })
            .take(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .collect()
    }
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteSource for SimulatedFeed {
    async fn snapshot(&self, limit: Option<usize>) -> Result<Snapshot, QuoteSourceError> {
        let quotes = self
            .quotes(QuoteFilter {
                limit: Some(limit.unwrap_or(DEFAULT_SNAPSHOT_LIMIT)),
                ..QuoteFilter::default()
            })
            .await?;

        Ok(Snapshot::new(quotes, Utc::now()))
    }

    async fn quotes(&self, filter: QuoteFilter) -> Result<Vec<Quote>, QuoteSourceError> {
        self.ensure_session();

        let now = Utc::now();
        let quotes: Vec<Quote> = self
            .filtered(&filter)
            .into_iter()
            .map(|base| self.jitter(base, now))
            .collect();

        tracing::debug!(count = quotes.len(), "fetched quotes");
        Ok(quotes)
    }

    async fn quote_detail(
        &self,
        symbol: &str,
        exchange: Venue,
    ) -> Result<Option<QuoteDetail>, QuoteSourceError> {
        self.ensure_session();

        let Some(base) = self
            .universe
            .iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol) && q.exchange == exchange)
        else {
            return Ok(None);
        };

        let quote = self.jitter(base, Utc::now());
        let additional_data = detail_extras(&quote);

        tracing::debug!(symbol = %quote.symbol, "fetched quote detail");
        Ok(Some(QuoteDetail {
            quote,
            additional_data,
        }))
    }

    async fn search(
        &self,
        query: &str,
        exchange: Option<Venue>,
        limit: usize,
    ) -> Result<Vec<QuoteSummary>, QuoteSourceError> {
        self.ensure_session();

        let needle = query.to_ascii_lowercase();
        let results: Vec<QuoteSummary> = self
            .universe
            .iter()
            .filter(|q| {
                q.symbol.to_ascii_lowercase().contains(&needle)
                    || q.company_name.to_ascii_lowercase().contains(&needle)
            })
            .filter(|q| exchange.is_none_or(|venue| q.exchange == venue))
            .take(limit)
            .map(QuoteSummary::from)
            .collect();

        tracing::debug!(query, count = results.len(), "search complete");
        Ok(results)
    }
}

/// Derive the extended fundamentals block from a repriced quote.
fn detail_extras(quote: &Quote) -> DetailExtras {
    let mut rng = rand::thread_rng();

    let eps = if quote.pe.is_zero() {
        Decimal::ZERO
    } else {
        (quote.ltp / quote.pe).round_dp(2)
    };
    let book_value = if quote.pb.is_zero() {
        Decimal::ZERO
    } else {
        (quote.ltp / quote.pb).round_dp(2)
    };
    let total_shares = if quote.ltp.is_zero() {
        0
    } else {
        (Decimal::from(quote.market_cap) / quote.ltp)
            .trunc()
            .to_u64()
            .unwrap_or(0)
    };

    DetailExtras {
        week_high_52: (quote.ltp * dec!(1.25)).round_dp(2),
        week_low_52: (quote.ltp * dec!(0.75)).round_dp(2),
        eps,
        book_value,
        face_value: 10,
        market_lot: 1,
        isin: synthetic_isin(&mut rng),
        industry: quote.sector.clone(),
        listing_date: "2023-01-15".to_string(),
        day_high: quote.high,
        day_low: quote.low,
        avg_volume: quote.volume * 8 / 10,
        total_shares,
        free_float: dec!(0.75),
    }
}

fn synthetic_isin(rng: &mut impl Rng) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let tail: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("INE{}", tail)
}

fn seed(
    symbol: &str,
    exchange: Venue,
    company_name: &str,
    ltp: Decimal,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: u64,
    avg_price: Decimal,
    market_cap: u64,
    pe: Decimal,
    pb: Decimal,
    dividend: Decimal,
    sector: &str,
) -> Quote {
    let mut quote = Quote {
        symbol: symbol.to_string(),
        exchange,
        company_name: company_name.to_string(),
        ltp,
        open,
        high,
        low,
        close,
        change: Decimal::ZERO,
        p_change: Decimal::ZERO,
        volume,
        avg_price,
        market_cap,
        pe,
        pb,
        dividend,
        sector: sector.to_string(),
        last_updated: None,
    };
    quote.recompute_derived();
    quote
}

fn seed_universe() -> Vec<Quote> {
    vec![
        seed(
            "RELIANCE",
            Venue::Nse,
            "Reliance Industries Limited",
            dec!(2456.75),
            dec!(2445.00),
            dec!(2467.80),
            dec!(2441.25),
            dec!(2450.30),
            1_234_567,
            dec!(2454.20),
            16_589_234_567_890,
            dec!(12.45),
            dec!(1.89),
            dec!(2.5),
            "Oil & Gas",
        ),
        seed(
            "TCS",
            Venue::Nse,
            "Tata Consultancy Services Limited",
            dec!(3567.90),
            dec!(3555.00),
            dec!(3578.45),
            dec!(3548.20),
            dec!(3560.15),
            987_654,
            dec!(3562.30),
            12_987_654_321_098,
            dec!(28.67),
            dec!(12.34),
            dec!(1.8),
            "Information Technology",
        ),
        seed(
            "HDFCBANK",
            Venue::Nse,
            "HDFC Bank Limited",
            dec!(1678.45),
            dec!(1672.30),
            dec!(1685.90),
            dec!(1669.80),
            dec!(1675.20),
            2_345_678,
            dec!(1676.85),
            9_876_543_210_987,
            dec!(18.92),
            dec!(2.45),
            dec!(3.2),
            "Banking",
        ),
        seed(
            "INFY",
            Venue::Nse,
            "Infosys Limited",
            dec!(1456.30),
            dec!(1448.75),
            dec!(1462.10),
            dec!(1445.60),
            dec!(1452.85),
            1_876_543,
            dec!(1454.20),
            6_123_456_789_012,
            dec!(24.56),
            dec!(8.91),
            dec!(2.1),
            "Information Technology",
        ),
        seed(
            "ICICIBANK",
            Venue::Nse,
            "ICICI Bank Limited",
            dec!(1234.67),
            dec!(1228.90),
            dec!(1238.45),
            dec!(1225.30),
            dec!(1230.22),
            3_456_789,
            dec!(1232.15),
            8_765_432_109_876,
            dec!(16.78),
            dec!(2.89),
            dec!(2.8),
            "Banking",
        ),
        seed(
            "TATAMOTORS",
            Venue::Bse,
            "Tata Motors Limited",
            dec!(987.40),
            dec!(981.10),
            dec!(991.75),
            dec!(978.65),
            dec!(983.55),
            4_567_890,
            dec!(985.30),
            3_278_456_120_450,
            dec!(9.87),
            dec!(3.12),
            dec!(1.1),
            "Automobiles",
        ),
        seed(
            "SBIN",
            Venue::Bse,
            "State Bank of India",
            dec!(812.25),
            dec!(808.00),
            dec!(816.40),
            dec!(805.90),
            dec!(809.70),
            5_678_901,
            dec!(811.05),
            7_245_890_345_678,
            dec!(11.34),
            dec!(1.76),
            dec!(4.0),
            "Banking",
        ),
    ]
}
