//! Derived market metrics for one book snapshot.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::error::SnapshotError;
use crate::orderbook::{BookSide, BookSnapshot, DepthLevel};

/// Immutable value object of metrics derived from one snapshot.
///
/// Prices and volumes stay in [`Decimal`]; dimensionless ratios are `f64`
/// so that `+inf` is representable for the imbalance of a one-sided book.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketMetrics {
    /// Best ask minus best bid.
    pub spread: Decimal,
    /// Midpoint of best bid and ask.
    pub mid_price: Decimal,
    /// Best bid price.
    pub best_bid: Decimal,
    /// Best ask price.
    pub best_ask: Decimal,
    /// Resting bid size within the near-spread window.
    pub near_bid_volume: Decimal,
    /// Resting ask size within the near-spread window.
    pub near_ask_volume: Decimal,
    /// Near-spread bid volume over ask volume; `+inf` when ask volume is 0.
    pub volume_imbalance: f64,
    /// Decayed consecutive-level volume ratio on the bid side.
    pub bid_pressure: f64,
    /// Decayed consecutive-level volume ratio on the ask side.
    pub ask_pressure: f64,
    /// Best bid size over near-spread bid volume.
    pub best_bid_concentration: f64,
    /// Best ask size over near-spread ask volume.
    pub best_ask_concentration: f64,
    /// When the metrics were computed.
    pub computed_at: OffsetDateTime,
}

/// Compute [`MarketMetrics`] from a snapshot.
///
/// The near-spread window is `spread * spread_multiplier` from the best
/// price of each side; `price_levels` is the depth used for pressure.
pub fn compute_metrics(
    snapshot: &BookSnapshot,
    spread_multiplier: Decimal,
    price_levels: usize,
) -> Result<MarketMetrics, SnapshotError> {
    let best_bid = snapshot
        .best_bid()
        .ok_or(SnapshotError::EmptySide(BookSide::Bid))?;
    let best_ask = snapshot
        .best_ask()
        .ok_or(SnapshotError::EmptySide(BookSide::Ask))?;

    let spread = best_ask - best_bid;
    let mid_price = (best_ask + best_bid) / Decimal::TWO;

    let near_threshold = spread * spread_multiplier;
    let near_bid_volume: Decimal = snapshot
        .bids
        .iter()
        .filter(|l| l.price >= best_bid - near_threshold)
        .map(|l| l.size)
        .sum();
    let near_ask_volume: Decimal = snapshot
        .asks
        .iter()
        .filter(|l| l.price <= best_ask + near_threshold)
        .map(|l| l.size)
        .sum();

    let volume_imbalance = if near_ask_volume.is_zero() {
        f64::INFINITY
    } else {
        ratio(near_bid_volume, near_ask_volume)
    };

    let bid_pressure = price_pressure(&snapshot.bids, price_levels);
    let ask_pressure = price_pressure(&snapshot.asks, price_levels);

    let best_bid_concentration = if near_bid_volume.is_zero() {
        0.0
    } else {
        ratio(snapshot.bids[0].size, near_bid_volume)
    };
    let best_ask_concentration = if near_ask_volume.is_zero() {
        0.0
    } else {
        ratio(snapshot.asks[0].size, near_ask_volume)
    };

    Ok(MarketMetrics {
        spread,
        mid_price,
        best_bid,
        best_ask,
        near_bid_volume,
        near_ask_volume,
        volume_imbalance,
        bid_pressure,
        ask_pressure,
        best_bid_concentration,
        best_ask_concentration,
        computed_at: OffsetDateTime::now_utc(),
    })
}

/// Decayed ratio of consecutive level volumes, best levels first.
///
/// Rewards size concentrated at the top of book, with the contribution of
/// deeper level pairs decayed by `1/(i+1)`. Returns `0.0` outright when the
/// side has fewer than `price_levels` levels.
pub fn price_pressure(levels: &[DepthLevel], price_levels: usize) -> f64 {
    if levels.len() < price_levels || price_levels < 2 {
        return 0.0;
    }

    let volumes: Vec<f64> = levels[..price_levels]
        .iter()
        .map(|l| l.size.to_f64().unwrap_or(0.0))
        .collect();

    let mut pressure = 0.0;
    for i in 0..volumes.len() - 1 {
        if volumes[i + 1] > 0.0 {
            pressure += (volumes[i] / volumes[i + 1]) * (1.0 / (i + 1) as f64);
        }
    }

    pressure / (price_levels - 1) as f64
}

fn ratio(numerator: Decimal, denominator: Decimal) -> f64 {
    (numerator / denominator).to_f64().unwrap_or(0.0)
}
