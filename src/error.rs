//! Unified error types for the market-making bot.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::orderbook::BookSide;

/// Unified error type for the bot.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Market data error.
    #[error("market error: {0}")]
    Market(#[from] MarketError),

    /// Order book snapshot error.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Trading/order error.
    #[error("trading error: {0}")]
    Trading(#[from] TradingError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Market data fetch errors.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Failed to fetch the order book.
    #[error("failed to fetch order book for {token_id}: {reason}")]
    BookUnavailable {
        /// Token the fetch was for.
        token_id: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to fetch the last trade price.
    #[error("failed to fetch last trade price for {token_id}: {reason}")]
    PriceUnavailable {
        /// Token the fetch was for.
        token_id: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to parse market data.
    #[error("failed to parse market data: {0}")]
    ParseError(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Order book snapshot construction errors.
///
/// A snapshot is never partially built: any of these discards the fetch.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// One side of the book has no resting levels.
    #[error("order book has no {0} levels")]
    EmptySide(BookSide),

    /// Best bid at or above best ask.
    #[error("crossed book: best_bid={best_bid} >= best_ask={best_ask}")]
    CrossedBook {
        /// Best bid price observed.
        best_bid: Decimal,
        /// Best ask price observed.
        best_ask: Decimal,
    },
}

/// Trading and order execution errors.
#[derive(Error, Debug)]
pub enum TradingError {
    /// Order submission failed.
    #[error("order submission failed: {0}")]
    SubmissionFailed(String),

    /// Failed to cancel order.
    #[error("failed to cancel order {order_id}: {reason}")]
    CancelFailed {
        /// Order ID that failed to cancel.
        order_id: String,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid order parameters.
    #[error("invalid order parameters: {0}")]
    InvalidParams(String),

    /// Order rejected by the exchange.
    #[error("order rejected: {reason}")]
    OrderRejected {
        /// Rejection reason from the exchange.
        reason: String,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;
