//! Favorability classification of market conditions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::metrics::{compute_metrics, MarketMetrics};
use crate::config::Config;
use crate::orderbook::BookSnapshot;

/// Spread below which the book counts as tight.
const TIGHT_SPREAD: Decimal = dec!(0.02);
/// Spread below which the book counts as very tight.
const VERY_TIGHT_SPREAD: Decimal = dec!(0.015);
/// Best-level concentration above which one side dominates its window.
const CONCENTRATION_LIMIT: f64 = 0.7;
/// Imbalance band treated as a balanced market.
const BALANCED_BAND: (f64, f64) = (0.8, 1.2);
/// Imbalance above which buyers clearly outweigh sellers.
const BUYER_IMBALANCE: f64 = 1.5;
/// Deviation of imbalance from parity that counts as skewed.
const IMBALANCE_DEVIATION: f64 = 0.5;

/// Outcome of one favorability evaluation.
#[derive(Debug, Clone)]
pub struct Verdict {
    /// Whether conditions justify quoting.
    pub is_favorable: bool,
    /// Human-readable reason for the classification.
    pub reason: String,
    /// Metrics backing the verdict; absent when computation failed.
    pub metrics: Option<MarketMetrics>,
}

impl Verdict {
    /// Unfavorable verdict for a cycle where no snapshot was obtained.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_favorable: false,
            reason: reason.into(),
            metrics: None,
        }
    }
}

/// Scores snapshots against the ordered favorability rule cascade.
#[derive(Debug, Clone)]
pub struct Evaluator {
    imbalance_threshold: f64,
    volume_threshold: f64,
    price_levels: usize,
    spread_multiplier: Decimal,
}

impl Evaluator {
    /// Create an evaluator with the configured thresholds.
    pub fn new(config: &Config) -> Self {
        Self {
            imbalance_threshold: config.imbalance_threshold,
            volume_threshold: config.volume_threshold,
            price_levels: config.price_levels,
            spread_multiplier: config.spread_multiplier,
        }
    }

    /// Evaluate one snapshot.
    ///
    /// A failure while computing metrics classifies as unfavorable with an
    /// error reason; it never propagates.
    pub fn evaluate(&self, snapshot: &BookSnapshot) -> Verdict {
        match compute_metrics(snapshot, self.spread_multiplier, self.price_levels) {
            Ok(metrics) => self.classify(metrics),
            Err(e) => {
                warn!(error = %e, "metric computation failed");
                Verdict::unavailable(format!("analysis failed: {e}"))
            }
        }
    }

    /// Run the rule cascade top to bottom; the first matching rule wins.
    ///
    /// The rules are not mutually exclusive, only the evaluation order
    /// makes the classification deterministic.
    fn classify(&self, metrics: MarketMetrics) -> Verdict {
        let m = &metrics;
        debug!(
            spread = %m.spread,
            volume_imbalance = m.volume_imbalance,
            bid_pressure = m.bid_pressure,
            ask_pressure = m.ask_pressure,
            "classifying snapshot"
        );

        let (is_favorable, reason) = if m.volume_imbalance > self.imbalance_threshold
            && (m.best_bid_concentration > CONCENTRATION_LIMIT
                || m.bid_pressure > self.volume_threshold)
        {
            (true, "strong buy pressure")
        } else if m.spread < TIGHT_SPREAD
            && (BALANCED_BAND.0..=BALANCED_BAND.1).contains(&m.volume_imbalance)
            && m.bid_pressure > self.volume_threshold
        {
            (true, "balanced market with buy pressure")
        } else if m.volume_imbalance > BUYER_IMBALANCE && m.spread < VERY_TIGHT_SPREAD {
            (true, "strong buyer imbalance with tight spread")
        } else if m.spread > TIGHT_SPREAD
            && (m.volume_imbalance - 1.0).abs() > IMBALANCE_DEVIATION
        {
            (false, "wide spread with imbalance")
        } else if m.volume_imbalance < 1.0 / self.imbalance_threshold
            && (m.best_ask_concentration > CONCENTRATION_LIMIT
                || m.ask_pressure > self.volume_threshold)
        {
            (false, "strong sell pressure")
        } else {
            (false, "neutral conditions")
        };

        Verdict {
            is_favorable,
            reason: reason.to_string(),
            metrics: Some(metrics),
        }
    }
}
