//! Polling control loop tying observation to the quote lifecycle.
//!
//! Each cycle fetches the last trade price and order book, classifies the
//! market, and reconciles the resting quote pair: unfavorable conditions
//! withdraw it, favorable conditions place it when flat, and a trade price
//! off the placement anchor re-prices it by withdrawing first. Cycle
//! errors notify the operator and back off; the loop itself never exits
//! except on shutdown signal.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::market::Exchange;
use crate::metrics;
use crate::notify::Notifier;
use crate::orderbook::{build_snapshot, BookSnapshot};
use crate::signal::{Evaluator, Verdict};
use crate::trading::{QuoteController, QuoteSizer};

/// Periodic liveness signal.
///
/// The first beat fires one full interval after construction, not
/// immediately.
#[derive(Debug)]
pub struct Heartbeat {
    interval: Duration,
    last_beat: Instant,
}

impl Heartbeat {
    /// Create a heartbeat anchored at the current instant.
    pub fn new(interval: Duration) -> Self {
        Self::anchored_at(interval, Instant::now())
    }

    /// Create a heartbeat anchored at a given instant.
    pub fn anchored_at(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_beat: now,
        }
    }

    /// Whether a beat is due at `now`; resets the interval when it is.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_beat) >= self.interval {
            self.last_beat = now;
            true
        } else {
            false
        }
    }

    /// Whether a beat is due right now.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }
}

/// The market-making engine for one token.
///
/// Generic over the venue so the control loop runs unchanged against the
/// live CLOB client or a scripted mock.
#[derive(Debug)]
pub struct Engine<E> {
    config: Config,
    exchange: E,
    evaluator: Evaluator,
    sizer: QuoteSizer,
    controller: QuoteController,
    notifier: Notifier,
    heartbeat: Heartbeat,
}

impl<E: Exchange> Engine<E> {
    /// Build an engine from config, a venue, and a notification channel.
    pub fn new(config: Config, exchange: E, notifier: Notifier) -> Self {
        let evaluator = Evaluator::new(&config);
        let sizer = QuoteSizer::new(&config);
        let controller = QuoteController::new(config.token_id.clone());
        let heartbeat = Heartbeat::new(Duration::from_secs(config.heartbeat_interval_secs));

        Self {
            config,
            exchange,
            evaluator,
            sizer,
            controller,
            notifier,
            heartbeat,
        }
    }

    /// The lifecycle controller, for state inspection.
    pub fn controller(&self) -> &QuoteController {
        &self.controller
    }

    /// Run the polling loop until a shutdown signal arrives.
    pub async fn run(&mut self) -> Result<()> {
        let mode = if self.config.dry_run { "dry-run" } else { "live" };
        self.notifier
            .notify(format!("market maker started ({mode} mode)"));

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received");
                    break;
                }
                () = self.tick() => {}
            }
        }

        self.notifier.notify("market maker stopped by operator");
        Ok(())
    }

    /// One cycle plus the pause that follows it.
    ///
    /// A cycle error is notified and answered with a longer backoff so a
    /// persistent fault does not hammer the venue; it never stops the
    /// loop.
    async fn tick(&mut self) {
        match self.cycle().await {
            Ok(()) => {
                tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms)).await;
            }
            Err(e) => {
                warn!(error = %e, "cycle failed, backing off");
                self.notifier.notify(format!("cycle error: {e}"));
                tokio::time::sleep(Duration::from_secs(self.config.error_backoff_secs)).await;
            }
        }
    }

    /// Run one observation/decision/action cycle.
    pub async fn cycle(&mut self) -> Result<()> {
        metrics::inc_cycles();

        if self.heartbeat.poll() {
            metrics::inc_heartbeats();
            self.notifier.notify("market maker alive");
        }

        // A missing trade price only blocks new placements; withdrawal
        // decisions still run on the book alone.
        let last_price = match self.exchange.last_trade_price(&self.config.token_id).await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(error = %e, "last trade price unavailable");
                None
            }
        };

        let (verdict, snapshot) = self.observe_market().await;
        if verdict.is_favorable {
            metrics::inc_favorable_verdicts();
        } else {
            metrics::inc_unfavorable_verdicts();
        }

        if !verdict.is_favorable {
            debug!(reason = %verdict.reason, "market unfavorable");
            self.notifier
                .notify(format!("market unfavorable: {}", verdict.reason));
            if self.controller.is_quoting() {
                self.controller
                    .withdraw(&self.exchange, &self.notifier)
                    .await;
            }
            return Ok(());
        }

        debug!(reason = %verdict.reason, "market favorable");

        // Re-price on drift: withdraw now, re-place below in the same
        // cycle at the fresh book's prices.
        if self.controller.is_quoting() {
            if let Some(price) = last_price {
                if self.controller.price_drifted(price) {
                    let anchor = self.controller.position().anchor_price;
                    self.notifier.notify(format!(
                        "trade price moved from anchor {} to {price}, re-pricing",
                        anchor.unwrap_or_default()
                    ));
                    self.controller
                        .withdraw(&self.exchange, &self.notifier)
                        .await;
                }
            }
        }

        if self.controller.is_quoting() {
            return Ok(());
        }

        let (Some(snapshot), Some(price)) = (snapshot, last_price) else {
            return Ok(());
        };
        let (Some(raw_ask), Some(raw_bid)) =
            (snapshot.second_best_ask(), snapshot.second_best_bid())
        else {
            debug!("book too shallow to quote one level off the top");
            return Ok(());
        };
        let Some(size) = self.sizer.order_size(price) else {
            warn!(price = %price, "cannot size orders at this price");
            return Ok(());
        };

        self.controller
            .enter_quotes(
                &self.exchange,
                &self.notifier,
                raw_ask.round_dp(4),
                raw_bid.round_dp(4),
                size,
                price,
            )
            .await;

        Ok(())
    }

    /// Fetch and classify the book.
    ///
    /// Fetch or normalization failures come back as an unfavorable verdict
    /// so the caller withdraws instead of erroring the cycle.
    async fn observe_market(&self) -> (Verdict, Option<BookSnapshot>) {
        let raw = match self.exchange.order_book(&self.config.token_id).await {
            Ok(raw) => raw,
            Err(e) => return (Verdict::unavailable(format!("order book unavailable: {e}")), None),
        };

        match build_snapshot(&self.config.token_id, raw) {
            Ok(snapshot) => {
                let verdict = self.evaluator.evaluate(&snapshot);
                (verdict, Some(snapshot))
            }
            Err(e) => (Verdict::unavailable(format!("invalid order book: {e}")), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heartbeat_is_silent_at_start() {
        let start = Instant::now();
        let mut heartbeat = Heartbeat::anchored_at(Duration::from_secs(60), start);
        assert!(!heartbeat.poll_at(start));
    }

    #[test]
    fn heartbeat_fires_once_per_interval() {
        let start = Instant::now();
        let mut heartbeat = Heartbeat::anchored_at(Duration::from_secs(60), start);

        // 125 one-second polls: beats at t=60 and t=120 only.
        let beats: Vec<u64> = (1..=125)
            .filter(|&t| heartbeat.poll_at(start + Duration::from_secs(t)))
            .collect();

        assert_eq!(beats, vec![60, 120]);
    }

    #[test]
    fn heartbeat_resets_from_the_served_poll() {
        let start = Instant::now();
        let mut heartbeat = Heartbeat::anchored_at(Duration::from_secs(60), start);

        // A late poll serves the beat and anchors the next interval there.
        assert!(heartbeat.poll_at(start + Duration::from_secs(90)));
        assert!(!heartbeat.poll_at(start + Duration::from_secs(120)));
        assert!(heartbeat.poll_at(start + Duration::from_secs(150)));
    }
}
