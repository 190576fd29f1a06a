//! Order types and creation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Order side on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order.
    #[strum(to_string = "BUY", serialize = "buy")]
    Buy,
    /// Sell order.
    #[strum(to_string = "SELL", serialize = "sell")]
    Sell,
}

/// Which leg of the quote pair an order belongs to.
///
/// A fixed enum key for per-side bookkeeping; resting order ids are only
/// ever looked up through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum QuoteSide {
    /// The resting sell quote above the mid.
    #[strum(serialize = "ask")]
    Ask,
    /// The resting buy quote below the mid.
    #[strum(serialize = "bid")]
    Bid,
}

impl QuoteSide {
    /// The wire-level order side used to rest this leg.
    pub fn order_side(self) -> Side {
        match self {
            QuoteSide::Ask => Side::Sell,
            QuoteSide::Bid => Side::Buy,
        }
    }
}

/// Order parameters for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderParams {
    /// Token ID to trade.
    pub token_id: String,
    /// Order side (buy/sell).
    pub side: Side,
    /// Limit price.
    pub price: Decimal,
    /// Order size.
    pub size: Decimal,
}

impl OrderParams {
    /// Create a new buy order.
    pub fn buy(token_id: impl Into<String>, price: Decimal, size: Decimal) -> Self {
        Self {
            token_id: token_id.into(),
            side: Side::Buy,
            price,
            size,
        }
    }

    /// Create a new sell order.
    pub fn sell(token_id: impl Into<String>, price: Decimal, size: Decimal) -> Self {
        Self {
            token_id: token_id.into(),
            side: Side::Sell,
            price,
            size,
        }
    }

    /// Validate order parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.token_id.is_empty() {
            return Err("token_id is required".to_string());
        }
        if self.price <= Decimal::ZERO {
            return Err("price must be positive".to_string());
        }
        if self.size <= Decimal::ZERO {
            return Err("size must be positive".to_string());
        }
        Ok(())
    }
}

/// A resting order tracked by the lifecycle controller.
///
/// The id is assigned by the venue and never reused; cancellation is
/// terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestingOrder {
    /// Venue-assigned order ID.
    pub id: String,
    /// Which quote leg this order is.
    pub side: QuoteSide,
    /// Resting limit price.
    pub price: Decimal,
    /// Resting size.
    pub size: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn order_params_creation() {
        let buy = OrderParams::buy("token-123", dec!(0.50), dec!(10));
        assert_eq!(buy.side, Side::Buy);
        assert_eq!(buy.price, dec!(0.50));
        assert_eq!(buy.size, dec!(10));

        let sell = OrderParams::sell("token-456", dec!(0.60), dec!(5));
        assert_eq!(sell.side, Side::Sell);
    }

    #[test]
    fn order_params_validation() {
        let valid = OrderParams::buy("token", dec!(0.50), dec!(10));
        assert!(valid.validate().is_ok());

        let no_token = OrderParams::buy("", dec!(0.50), dec!(10));
        assert!(no_token.validate().is_err());

        let zero_price = OrderParams::buy("token", dec!(0), dec!(10));
        assert!(zero_price.validate().is_err());

        let negative_size = OrderParams::buy("token", dec!(0.50), dec!(-10));
        assert!(negative_size.validate().is_err());
    }

    #[test]
    fn quote_side_maps_to_order_side() {
        assert_eq!(QuoteSide::Ask.order_side(), Side::Sell);
        assert_eq!(QuoteSide::Bid.order_side(), Side::Buy);
    }

    #[test]
    fn side_from_string_works() {
        use std::str::FromStr;
        assert_eq!(Side::from_str("BUY").unwrap(), Side::Buy);
        assert_eq!(Side::from_str("sell").unwrap(), Side::Sell);
    }
}
