use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::channel::{ClientChannel, ConnectionId};
use super::message::ServerMessage;
use super::registry::ConnectionRegistry;
use crate::application::ports::QuoteSource;

/// Demand-driven publish loop over the connection registry.
///
/// The loop runs only while at least one channel is registered: the first
/// registration starts it and the last removal cancels it, so an idle
/// server never polls the quote feed. Each tick performs exactly one fetch
/// and serializes exactly one frame, which every registered channel
/// receives; a channel whose send fails is removed before the tick ends.
///
/// Activation edges are decided while holding the loop-handle lock, making
/// them atomic with the membership change that caused them. The lock is
/// never held across an await; fetch and fan-out run against a
/// point-in-time snapshot of the membership.
pub struct QuoteBroadcaster {
    registry: Arc<ConnectionRegistry>,
    source: Arc<dyn QuoteSource>,
    period: Duration,
    snapshot_limit: usize,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl QuoteBroadcaster {
    pub fn new(source: Arc<dyn QuoteSource>, period: Duration, snapshot_limit: usize) -> Self {
        QuoteBroadcaster {
            registry: Arc::new(ConnectionRegistry::new()),
            source,
            period,
            snapshot_limit,
            ticker: Arc::new(Mutex::new(None)),
        }
    }

    /// Number of currently registered connections (health/metrics hook).
    pub fn connected_count(&self) -> usize {
        self.registry.len()
    }

    /// Whether the publish loop is currently running.
    pub fn is_streaming(&self) -> bool {
        self.ticker.lock().is_some()
    }

    /// Add a channel to the fan-out, starting the publish loop on the
    /// empty-to-non-empty edge.
    pub fn register(&self, channel: ClientChannel) {
        self.registry.insert(channel);

        let mut ticker = self.ticker.lock();
        if ticker.is_none() {
            *ticker = Some(self.spawn_ticker());
            tracing::info!("starting live data streaming");
        }
    }

    /// Remove a channel, cancelling the publish loop on the transition to
    /// empty. Safe to call for an already-removed channel.
    pub fn unregister(&self, id: ConnectionId) {
        self.registry.remove(id);

        let mut ticker = self.ticker.lock();
        if self.registry.is_empty() {
            if let Some(handle) = ticker.take() {
                handle.abort();
                tracing::info!("stopped live data streaming, no clients connected");
            }
        }
    }

    /// Fetch one snapshot and push it to a single channel, independent of
    /// the loop cadence, so a newly joined viewer does not wait for the
    /// next tick. A send failure drops the channel.
    pub async fn push_snapshot(&self, channel: &ClientChannel) {
        let snapshot = match self.source.snapshot(Some(self.snapshot_limit)).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(%err, "initial snapshot fetch failed");
                return;
            }
        };

        if let Ok(frame) = ServerMessage::live_data(&snapshot).to_json() {
            if let Err(err) = channel.send(frame) {
                tracing::warn!(%err, connection = %channel.id(), "initial send failed, dropping client");
                self.unregister(channel.id());
            }
        }
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let registry = Arc::clone(&self.registry);
        let source = Arc::clone(&self.source);
        let ticker = Arc::clone(&self.ticker);
        let period = self.period;
        let limit = self.snapshot_limit;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; new clients already got
            // their ad-hoc snapshot, so wait a full period instead.
            interval.tick().await;

            loop {
                interval.tick().await;
                Self::broadcast_tick(&registry, &source, limit).await;

                // Every channel may have failed mid-tick; treat that like
                // the last unregistration and let the loop wind down.
                if registry.is_empty() {
                    let mut guard = ticker.lock();
                    if registry.is_empty() {
                        guard.take();
                        tracing::info!("stopped live data streaming, no clients connected");
                        return;
                    }
                }
            }
        })
    }

    /// One fetch-and-fan-out cycle. Ticks are awaited sequentially by the
    /// loop, so two cycles never run concurrently against the registry.
    async fn broadcast_tick(
        registry: &ConnectionRegistry,
        source: &Arc<dyn QuoteSource>,
        limit: usize,
    ) {
        if registry.is_empty() {
            return;
        }

        let snapshot = match source.snapshot(Some(limit)).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(%err, "snapshot fetch failed, skipping tick");
                return;
            }
        };

        let frame = match ServerMessage::live_data(&snapshot).to_json() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(%err, "failed to encode live data frame");
                return;
            }
        };

        let mut delivered = 0usize;
        for channel in registry.channels() {
            match channel.send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::info!(%err, connection = %channel.id(), "removing unreachable client");
                    registry.remove(channel.id());
                }
            }
        }

        tracing::debug!(delivered, "broadcast live data");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{QuoteFilter, QuoteSourceError};
    use crate::domain::{Quote, QuoteDetail, QuoteSummary, Snapshot, Venue};
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::mpsc;
    use tokio::sync::mpsc::error::TryRecvError;

    const PERIOD: Duration = Duration::from_secs(5);

    fn sample_quote() -> Quote {
        let mut quote = Quote {
            symbol: "TCS".to_string(),
            exchange: Venue::Nse,
            company_name: "Tata Consultancy Services Limited".to_string(),
            ltp: dec!(3567.90),
            open: dec!(3555.00),
            high: dec!(3578.45),
            low: dec!(3548.20),
            close: dec!(3560.15),
            change: Decimal::ZERO,
            p_change: Decimal::ZERO,
            volume: 987_654,
            avg_price: dec!(3562.30),
            market_cap: 12_987_654_321_098,
            pe: dec!(28.67),
            pb: dec!(12.34),
            dividend: dec!(1.8),
            sector: "Information Technology".to_string(),
            last_updated: None,
        };
        quote.recompute_derived();
        quote
    }

    /// Scripted quote source: counts fetches and can be toggled to fail.
    struct ScriptedSource {
        fetches: AtomicUsize,
        failing: AtomicBool,
    }

    impl ScriptedSource {
        fn new() -> Arc<Self> {
            Arc::new(ScriptedSource {
                fetches: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
            })
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl QuoteSource for ScriptedSource {
        async fn snapshot(&self, _limit: Option<usize>) -> Result<Snapshot, QuoteSourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(QuoteSourceError::Unavailable("scripted outage".to_string()));
            }
            Ok(Snapshot::new(vec![sample_quote()], Utc::now()))
        }

        async fn quotes(&self, _filter: QuoteFilter) -> Result<Vec<Quote>, QuoteSourceError> {
            Ok(Vec::new())
        }

        async fn quote_detail(
            &self,
            _symbol: &str,
            _exchange: Venue,
        ) -> Result<Option<QuoteDetail>, QuoteSourceError> {
            Ok(None)
        }

        async fn search(
            &self,
            _query: &str,
            _exchange: Option<Venue>,
            _limit: usize,
        ) -> Result<Vec<QuoteSummary>, QuoteSourceError> {
            Ok(Vec::new())
        }
    }

    fn broadcaster(source: Arc<ScriptedSource>) -> QuoteBroadcaster {
        QuoteBroadcaster::new(source, PERIOD, 10)
    }

    fn subscriber() -> (ClientChannel, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        (ClientChannel::new(tx), rx)
    }

    async fn one_period() {
        tokio::time::sleep(PERIOD + Duration::from_millis(100)).await;
    }

    fn data_of(frame: &str) -> Value {
        let value: Value = serde_json::from_str(frame).unwrap();
        assert_eq!(value["type"], "liveData");
        value["data"].clone()
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_fans_out_identical_frames_from_one_fetch() {
        let source = ScriptedSource::new();
        let broadcaster = broadcaster(Arc::clone(&source));

        let (a, mut rx_a) = subscriber();
        let (b, mut rx_b) = subscriber();
        broadcaster.register(a);
        broadcaster.register(b);

        one_period().await;

        let frame_a = rx_a.try_recv().unwrap();
        let frame_b = rx_b.try_recv().unwrap();
        assert_eq!(data_of(&frame_a), data_of(&frame_b));

        // One fetch served every recipient
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_edges_follow_registrations() {
        let source = ScriptedSource::new();
        let broadcaster = broadcaster(Arc::clone(&source));
        assert!(!broadcaster.is_streaming());

        let (a, mut rx_a) = subscriber();
        let id = a.id();
        broadcaster.register(a);
        assert!(broadcaster.is_streaming());

        one_period().await;
        assert!(rx_a.try_recv().is_ok());

        broadcaster.unregister(id);
        assert!(!broadcaster.is_streaming());
        assert_eq!(broadcaster.connected_count(), 0);

        // No tick fires while idle
        let fetches = source.fetch_count();
        one_period().await;
        one_period().await;
        assert_eq!(source.fetch_count(), fetches);
        // The registry dropped its sender on unregister, so at most a
        // disconnect marker remains; no frame was queued while idle.
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_send_removes_channel_before_tick_completes() {
        let source = ScriptedSource::new();
        let broadcaster = broadcaster(Arc::clone(&source));

        let (a, rx_a) = subscriber();
        let (b, mut rx_b) = subscriber();
        broadcaster.register(a);
        broadcaster.register(b);
        drop(rx_a); // a's transport goes away

        one_period().await;

        assert_eq!(broadcaster.connected_count(), 1);
        assert!(rx_b.try_recv().is_ok());

        // The survivor keeps receiving alone
        one_period().await;
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_winds_down_when_every_send_fails() {
        let source = ScriptedSource::new();
        let broadcaster = broadcaster(Arc::clone(&source));

        let (a, rx_a) = subscriber();
        broadcaster.register(a);
        drop(rx_a);

        one_period().await;
        assert_eq!(broadcaster.connected_count(), 0);
        assert!(!broadcaster.is_streaming());

        let fetches = source.fetch_count();
        one_period().await;
        assert_eq!(source.fetch_count(), fetches);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_skips_tick_and_loop_survives() {
        let source = ScriptedSource::new();
        let broadcaster = broadcaster(Arc::clone(&source));

        let (a, mut rx_a) = subscriber();
        broadcaster.register(a);

        source.set_failing(true);
        one_period().await;
        assert_eq!(rx_a.try_recv(), Err(TryRecvError::Empty));
        assert!(broadcaster.is_streaming());
        assert_eq!(broadcaster.connected_count(), 1);

        // Next tick proceeds normally once the feed recovers
        source.set_failing(false);
        one_period().await;
        assert!(rx_a.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_unregister_is_a_noop() {
        let source = ScriptedSource::new();
        let broadcaster = broadcaster(source);

        let (a, _rx_a) = subscriber();
        let (b, _rx_b) = subscriber();
        let id_a = a.id();
        broadcaster.register(a);
        broadcaster.register(b);

        broadcaster.unregister(id_a);
        broadcaster.unregister(id_a);

        assert_eq!(broadcaster.connected_count(), 1);
        assert!(broadcaster.is_streaming());
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_snapshot_is_immediate() {
        let source = ScriptedSource::new();
        let broadcaster = broadcaster(Arc::clone(&source));

        let (a, mut rx_a) = subscriber();
        broadcaster.push_snapshot(&a).await;

        // No time advanced, no registration needed
        let frame = rx_a.try_recv().unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&frame).unwrap()["type"],
            "liveData"
        );
        assert_eq!(source.fetch_count(), 1);
    }

    /// The end-to-end lifecycle: immediate snapshot, shared ticks, failure
    /// cleanup, and full wind-down.
    #[tokio::test(start_paused = true)]
    async fn test_connection_lifecycle_scenario() {
        let source = ScriptedSource::new();
        let broadcaster = broadcaster(Arc::clone(&source));

        // A joins and immediately gets an ad-hoc snapshot
        let (a, mut rx_a) = subscriber();
        broadcaster.register(a.clone());
        broadcaster.push_snapshot(&a).await;
        assert!(rx_a.try_recv().is_ok());

        // B joins; the next tick reaches both with identical data
        let (b, mut rx_b) = subscriber();
        let id_b = b.id();
        broadcaster.register(b);
        one_period().await;
        let frame_a = rx_a.try_recv().unwrap();
        let frame_b = rx_b.try_recv().unwrap();
        assert_eq!(data_of(&frame_a), data_of(&frame_b));

        // A's transport dies; the following tick drops it and B carries on
        drop(rx_a);
        one_period().await;
        assert_eq!(broadcaster.connected_count(), 1);
        assert!(rx_b.try_recv().is_ok());

        // B leaves; the loop stops and nobody hears anything anymore
        broadcaster.unregister(id_b);
        assert!(!broadcaster.is_streaming());
        let fetches = source.fetch_count();
        one_period().await;
        assert_eq!(source.fetch_count(), fetches);
        assert!(rx_b.try_recv().is_err());
    }
}
