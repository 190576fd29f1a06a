//! Order book types and data structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;
use time::OffsetDateTime;

/// Which side of the book a level rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    /// Resting buy interest.
    #[strum(serialize = "bid")]
    Bid,
    /// Resting sell interest.
    #[strum(serialize = "ask")]
    Ask,
}

/// Single raw price level as observed from the venue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceLevel {
    /// Price at this level.
    pub price: Decimal,
    /// Total size available at this price.
    pub size: Decimal,
}

impl PriceLevel {
    /// Create a new price level.
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// Unnormalized bid/ask levels as returned by the market data collaborator.
#[derive(Debug, Clone, Default)]
pub struct RawBook {
    /// Bid levels, in no particular order.
    pub bids: Vec<PriceLevel>,
    /// Ask levels, in no particular order.
    pub asks: Vec<PriceLevel>,
}

/// Depth-aggregated level within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    /// Price at this level.
    pub price: Decimal,
    /// Size resting at this level.
    pub size: Decimal,
    /// Running sum of size from the best price out to this level.
    pub cumulative_size: Decimal,
}

/// Normalized order book snapshot for one instrument.
///
/// Built exclusively by [`build_snapshot`](super::build_snapshot), which
/// guarantees both sides are non-empty, sorted best-price first (bids
/// descending, asks ascending), cumulative sizes are monotonically
/// non-decreasing along each side, and the book is not crossed.
#[derive(Debug, Clone)]
pub struct BookSnapshot {
    /// Token ID this snapshot represents.
    pub token_id: String,
    /// Bid levels, best (highest) price first.
    pub bids: Vec<DepthLevel>,
    /// Ask levels, best (lowest) price first.
    pub asks: Vec<DepthLevel>,
    /// When this snapshot was captured.
    pub captured_at: OffsetDateTime,
}

impl BookSnapshot {
    /// Get the best bid price.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    /// Get the best ask price.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    /// Second-best bid price, the resting reference for new bid quotes.
    ///
    /// Quoting one level off the top avoids sitting exactly at the
    /// top of book.
    pub fn second_best_bid(&self) -> Option<Decimal> {
        self.bids.get(1).map(|l| l.price)
    }

    /// Second-best ask price, the resting reference for new ask quotes.
    pub fn second_best_ask(&self) -> Option<Decimal> {
        self.asks.get(1).map(|l| l.price)
    }

    /// Get the spread between best bid and ask.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Total resting size on one side.
    pub fn total_size(&self, side: BookSide) -> Decimal {
        let levels = match side {
            BookSide::Bid => &self.bids,
            BookSide::Ask => &self.asks,
        };
        levels.last().map(|l| l.cumulative_size).unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn depth(levels: &[(Decimal, Decimal)]) -> Vec<DepthLevel> {
        let mut cumulative = Decimal::ZERO;
        levels
            .iter()
            .map(|&(price, size)| {
                cumulative += size;
                DepthLevel {
                    price,
                    size,
                    cumulative_size: cumulative,
                }
            })
            .collect()
    }

    fn snapshot() -> BookSnapshot {
        BookSnapshot {
            token_id: "test".to_string(),
            bids: depth(&[(dec!(0.50), dec!(100)), (dec!(0.49), dec!(50))]),
            asks: depth(&[(dec!(0.52), dec!(10)), (dec!(0.53), dec!(40))]),
            captured_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn best_and_second_best_prices() {
        let snap = snapshot();
        assert_eq!(snap.best_bid(), Some(dec!(0.50)));
        assert_eq!(snap.best_ask(), Some(dec!(0.52)));
        assert_eq!(snap.second_best_bid(), Some(dec!(0.49)));
        assert_eq!(snap.second_best_ask(), Some(dec!(0.53)));
        assert_eq!(snap.spread(), Some(dec!(0.02)));
    }

    #[test]
    fn second_best_requires_depth() {
        let snap = BookSnapshot {
            token_id: "test".to_string(),
            bids: depth(&[(dec!(0.50), dec!(100))]),
            asks: depth(&[(dec!(0.52), dec!(10))]),
            captured_at: OffsetDateTime::now_utc(),
        };
        assert_eq!(snap.second_best_bid(), None);
        assert_eq!(snap.second_best_ask(), None);
    }

    #[test]
    fn total_size_reads_cumulative_tail() {
        let snap = snapshot();
        assert_eq!(snap.total_size(BookSide::Bid), dec!(150));
        assert_eq!(snap.total_size(BookSide::Ask), dec!(50));
    }

    #[test]
    fn book_side_display() {
        assert_eq!(BookSide::Bid.to_string(), "bid");
        assert_eq!(BookSide::Ask.to_string(), "ask");
    }
}
