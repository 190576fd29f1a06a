//! Mock exchange for unit and integration tests.
//!
//! Scripts order book, price, and order responses without making network
//! requests, and records every venue call for ordering assertions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use super::Exchange;
use crate::error::{MarketError, TradingError};
use crate::orderbook::{PriceLevel, RawBook};
use crate::trading::OrderParams;

/// Failure switches for the mock.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFailures {
    /// Fail order book fetches.
    pub order_book: bool,
    /// Fail last-trade-price fetches.
    pub last_trade_price: bool,
    /// Fail cancellations.
    pub cancel: bool,
}

/// Scripted in-memory exchange.
#[derive(Debug, Clone, Default)]
pub struct MockExchange {
    book: Arc<Mutex<Option<RawBook>>>,
    last_price: Arc<Mutex<Option<Decimal>>>,
    failures: Arc<Mutex<MockFailures>>,
    /// Queued submit outcomes; when empty, submissions succeed with a
    /// generated id.
    submit_script: Arc<Mutex<VecDeque<Result<String, TradingError>>>>,
    submitted: Arc<Mutex<Vec<OrderParams>>>,
    cancelled: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
    next_id: Arc<AtomicU64>,
}

impl MockExchange {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the order book returned by subsequent fetches.
    pub fn set_book(&self, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) {
        *self.book.lock().unwrap() = Some(RawBook { bids, asks });
    }

    /// Set the last trade price returned by subsequent fetches.
    pub fn set_last_price(&self, price: Decimal) {
        *self.last_price.lock().unwrap() = Some(price);
    }

    /// Toggle failure modes.
    pub fn set_failures(&self, failures: MockFailures) {
        *self.failures.lock().unwrap() = failures;
    }

    /// Queue an explicit outcome for the next submission.
    pub fn queue_submit(&self, outcome: Result<String, TradingError>) {
        self.submit_script.lock().unwrap().push_back(outcome);
    }

    /// Orders submitted so far, in call order.
    pub fn submitted(&self) -> Vec<OrderParams> {
        self.submitted.lock().unwrap().clone()
    }

    /// Order ids cancelled so far, in call order.
    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }

    /// Every venue call in order, as `"submit SELL@0.511"` / `"cancel mock-1"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Exchange for MockExchange {
    async fn order_book(&self, token_id: &str) -> Result<RawBook, MarketError> {
        self.record("order_book".to_string());

        if self.failures.lock().unwrap().order_book {
            return Err(MarketError::BookUnavailable {
                token_id: token_id.to_string(),
                reason: "mock order book failure".to_string(),
            });
        }

        self.book
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| MarketError::BookUnavailable {
                token_id: token_id.to_string(),
                reason: "no book configured".to_string(),
            })
    }

    async fn last_trade_price(&self, token_id: &str) -> Result<Decimal, MarketError> {
        self.record("last_trade_price".to_string());

        if self.failures.lock().unwrap().last_trade_price {
            return Err(MarketError::PriceUnavailable {
                token_id: token_id.to_string(),
                reason: "mock price failure".to_string(),
            });
        }

        self.last_price
            .lock()
            .unwrap()
            .ok_or_else(|| MarketError::PriceUnavailable {
                token_id: token_id.to_string(),
                reason: "no price configured".to_string(),
            })
    }

    async fn submit_order(&self, params: &OrderParams) -> Result<String, TradingError> {
        self.record(format!("submit {}@{}", params.side, params.price));

        let scripted = self.submit_script.lock().unwrap().pop_front();
        let result = match scripted {
            Some(outcome) => outcome,
            None => Ok(format!("mock-{}", self.next_id.fetch_add(1, Ordering::Relaxed))),
        };

        if result.is_ok() {
            self.submitted.lock().unwrap().push(params.clone());
        }
        result
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), TradingError> {
        self.record(format!("cancel {order_id}"));

        if self.failures.lock().unwrap().cancel {
            return Err(TradingError::CancelFailed {
                order_id: order_id.to_string(),
                reason: "mock cancel failure".to_string(),
            });
        }

        self.cancelled.lock().unwrap().push(order_id.to_string());
        Ok(())
    }
}
