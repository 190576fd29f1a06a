//! Quote sizing from the notional budget.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::Config;

/// Divisor applied to the affordable share count before submission.
///
/// Slightly more than a straight halving across the two legs. Empirical
/// tuning constant inherited from production; not derived from anything.
const SIZE_DIVISOR: Decimal = dec!(2.05);

/// Derives per-order size from the notional budget and last trade price.
#[derive(Debug, Clone)]
pub struct QuoteSizer {
    notional_budget: Decimal,
    slippage_buffer: Decimal,
}

impl QuoteSizer {
    /// Create a sizer with the configured budget and slippage buffer.
    pub fn new(config: &Config) -> Self {
        Self {
            notional_budget: config.notional_budget,
            slippage_buffer: config.slippage_buffer,
        }
    }

    /// Whole shares affordable at the buffered last trade price.
    ///
    /// `floor(budget / (last_trade_price + slippage_buffer))`. Returns
    /// `None` when the buffered price is not positive.
    pub fn shares(&self, last_trade_price: Decimal) -> Option<Decimal> {
        let buffered = last_trade_price + self.slippage_buffer;
        if buffered <= Decimal::ZERO {
            return None;
        }
        Some((self.notional_budget / buffered).floor())
    }

    /// Size submitted per order: affordable shares over [`SIZE_DIVISOR`].
    pub fn order_size(&self, last_trade_price: Decimal) -> Option<Decimal> {
        self.shares(last_trade_price).map(|s| s / SIZE_DIVISOR)
    }
}
