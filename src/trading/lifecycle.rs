//! Quote lifecycle state machine.
//!
//! Two states: `Flat` (nothing resting) and `Quoting` (at least one side
//! resting). Entering quotes places the ask then the bid; withdrawing
//! cancels the ask then the bid and always returns to `Flat`, even when a
//! cancel fails, so a stuck venue order never wedges the loop.

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::market::Exchange;
use crate::metrics;
use crate::notify::Notifier;
use crate::trading::order::{OrderParams, QuoteSide, RestingOrder};

/// Lifecycle state of the quoting loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteState {
    /// No resting orders.
    Flat,
    /// At least one side resting at the venue.
    Quoting,
}

/// Resting orders and the trade price they were anchored to.
#[derive(Debug, Clone, Default)]
pub struct PositionState {
    /// Resting sell order, if placement succeeded.
    pub ask: Option<RestingOrder>,
    /// Resting buy order, if placement succeeded.
    pub bid: Option<RestingOrder>,
    /// Last trade price observed when the quotes were placed.
    pub anchor_price: Option<Decimal>,
}

impl PositionState {
    /// Whether any side is resting at the venue.
    pub fn is_position(&self) -> bool {
        self.ask.is_some() || self.bid.is_some()
    }
}

/// Owns the resting quote pair for one token and drives its transitions.
#[derive(Debug)]
pub struct QuoteController {
    token_id: String,
    position: PositionState,
}

impl QuoteController {
    /// Create a flat controller for a token.
    pub fn new(token_id: impl Into<String>) -> Self {
        Self {
            token_id: token_id.into(),
            position: PositionState::default(),
        }
    }

    /// Current lifecycle state, derived from the resting orders.
    pub fn state(&self) -> QuoteState {
        if self.position.is_position() {
            QuoteState::Quoting
        } else {
            QuoteState::Flat
        }
    }

    /// Whether any quote is resting.
    pub fn is_quoting(&self) -> bool {
        self.position.is_position()
    }

    /// Resting orders and anchor.
    pub fn position(&self) -> &PositionState {
        &self.position
    }

    /// Whether the last trade price has moved off the placement anchor.
    ///
    /// Always false when flat or when no placement succeeded.
    pub fn price_drifted(&self, last_trade_price: Decimal) -> bool {
        matches!(self.position.anchor_price, Some(anchor) if anchor != last_trade_price)
    }

    /// Place the quote pair: ask first, then bid.
    ///
    /// No-op when already quoting. A failed side is notified and skipped
    /// without rolling back the other side; the anchor is recorded as long
    /// as at least one side rests.
    #[instrument(skip(self, exchange, notifier), fields(ask = %ask_price, bid = %bid_price))]
    pub async fn enter_quotes<E: Exchange>(
        &mut self,
        exchange: &E,
        notifier: &Notifier,
        ask_price: Decimal,
        bid_price: Decimal,
        size: Decimal,
        anchor_price: Decimal,
    ) -> QuoteState {
        if self.is_quoting() {
            debug!("already quoting, skipping placement");
            return QuoteState::Quoting;
        }

        self.position.ask = self
            .place_side(exchange, notifier, QuoteSide::Ask, ask_price, size)
            .await;
        self.position.bid = self
            .place_side(exchange, notifier, QuoteSide::Bid, bid_price, size)
            .await;

        if self.position.is_position() {
            self.position.anchor_price = Some(anchor_price);
        }

        self.state()
    }

    async fn place_side<E: Exchange>(
        &self,
        exchange: &E,
        notifier: &Notifier,
        side: QuoteSide,
        price: Decimal,
        size: Decimal,
    ) -> Option<RestingOrder> {
        let params = OrderParams {
            token_id: self.token_id.clone(),
            side: side.order_side(),
            price,
            size,
        };

        match exchange.submit_order(&params).await {
            Ok(id) => {
                metrics::inc_orders_placed();
                notifier.notify(format!("{side} order placed at {price} (id: {id})"));
                Some(RestingOrder {
                    id,
                    side,
                    price,
                    size,
                })
            }
            Err(e) => {
                metrics::inc_order_failures();
                warn!(side = %side, price = %price, error = %e, "order placement failed");
                notifier.notify(format!("failed to place {side} order at {price}: {e}"));
                None
            }
        }
    }

    /// Cancel the resting pair: ask first, then bid.
    ///
    /// Each cancel failure is notified, but the controller always clears
    /// both sides and the anchor and returns to `Flat`.
    #[instrument(skip(self, exchange, notifier))]
    pub async fn withdraw<E: Exchange>(
        &mut self,
        exchange: &E,
        notifier: &Notifier,
    ) -> QuoteState {
        let resting = [self.position.ask.take(), self.position.bid.take()];

        for order in resting.into_iter().flatten() {
            match exchange.cancel_order(&order.id).await {
                Ok(()) => {
                    metrics::inc_orders_cancelled();
                    notifier.notify(format!("cancelled {} order {}", order.side, order.id));
                }
                Err(e) => {
                    metrics::inc_order_failures();
                    warn!(side = %order.side, order_id = %order.id, error = %e, "cancel failed");
                    notifier.notify(format!(
                        "failed to cancel {} order {}: {e}",
                        order.side, order.id
                    ));
                }
            }
        }

        self.position.anchor_price = None;
        QuoteState::Flat
    }
}
