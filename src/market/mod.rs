//! Market access for the quoted instrument.
//!
//! The [`Exchange`] trait is the seam between the trading core and the
//! venue: order book and last-trade-price fetches plus order submission
//! and cancellation. [`ClobClient`] talks to the Polymarket CLOB REST
//! API; [`MockExchange`] scripts responses for tests.

pub mod client;
pub mod mock;

pub use client::ClobClient;
pub use mock::MockExchange;

use rust_decimal::Decimal;

use crate::error::{MarketError, TradingError};
use crate::orderbook::RawBook;
use crate::trading::OrderParams;

/// Abstract venue operations consumed by the trading core.
///
/// All calls block the single loop task; none are cancelled mid-flight.
#[allow(async_fn_in_trait)]
pub trait Exchange {
    /// Fetch raw bid/ask levels for a token.
    async fn order_book(&self, token_id: &str) -> Result<RawBook, MarketError>;

    /// Fetch the last trade price for a token.
    async fn last_trade_price(&self, token_id: &str) -> Result<Decimal, MarketError>;

    /// Submit an order, returning the venue-assigned order id.
    async fn submit_order(&self, params: &OrderParams) -> Result<String, TradingError>;

    /// Cancel a resting order by id.
    async fn cancel_order(&self, order_id: &str) -> Result<(), TradingError>;
}
