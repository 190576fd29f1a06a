//! Snapshot construction from raw venue levels.

use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::instrument;

use super::types::{BookSide, BookSnapshot, DepthLevel, PriceLevel, RawBook};
use crate::error::SnapshotError;

/// Build a normalized [`BookSnapshot`] from raw bid/ask levels.
///
/// Zero-size levels are dropped, each side is sorted best-price first and
/// annotated with cumulative size running from the best price outward.
/// An empty side or a crossed book (best bid at or above best ask) is an
/// error and no snapshot is produced.
#[instrument(skip(raw), fields(token_id = %token_id))]
pub fn build_snapshot(token_id: &str, raw: RawBook) -> Result<BookSnapshot, SnapshotError> {
    let mut bids: Vec<PriceLevel> = raw
        .bids
        .into_iter()
        .filter(|l| l.size > Decimal::ZERO)
        .collect();
    let mut asks: Vec<PriceLevel> = raw
        .asks
        .into_iter()
        .filter(|l| l.size > Decimal::ZERO)
        .collect();

    if bids.is_empty() {
        return Err(SnapshotError::EmptySide(BookSide::Bid));
    }
    if asks.is_empty() {
        return Err(SnapshotError::EmptySide(BookSide::Ask));
    }

    // Best price first: bids descending, asks ascending.
    bids.sort_by(|a, b| b.price.cmp(&a.price));
    asks.sort_by(|a, b| a.price.cmp(&b.price));

    let best_bid = bids[0].price;
    let best_ask = asks[0].price;
    if best_bid >= best_ask {
        return Err(SnapshotError::CrossedBook { best_bid, best_ask });
    }

    Ok(BookSnapshot {
        token_id: token_id.to_string(),
        bids: accumulate(bids),
        asks: accumulate(asks),
        captured_at: OffsetDateTime::now_utc(),
    })
}

/// Annotate sorted levels with a running size sum from the best price out.
fn accumulate(levels: Vec<PriceLevel>) -> Vec<DepthLevel> {
    let mut cumulative = Decimal::ZERO;
    levels
        .into_iter()
        .map(|l| {
            cumulative += l.size;
            DepthLevel {
                price: l.price,
                size: l.size,
                cumulative_size: cumulative,
            }
        })
        .collect()
}
