//! Polymarket CLOB API client.

use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::Exchange;
use crate::config::Config;
use crate::error::{MarketError, TradingError};
use crate::orderbook::{PriceLevel, RawBook};
use crate::trading::OrderParams;

/// Counter for synthesized dry-run order ids.
static DRY_RUN_SEQ: AtomicU64 = AtomicU64::new(1);

/// Polymarket CLOB REST client.
///
/// Request signing and API credentials are out of scope here; in live mode
/// an unauthenticated submission is rejected by the venue and surfaces as a
/// transient [`TradingError`].
#[derive(Debug, Clone)]
pub struct ClobClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL for CLOB API.
    clob_url: String,
    /// Simulation mode: synthesize order ids instead of posting.
    dry_run: bool,
}

/// Order book response from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBookResponse {
    /// Bid levels.
    pub bids: Option<Vec<OrderLevel>>,
    /// Ask levels.
    pub asks: Option<Vec<OrderLevel>>,
}

/// Single price level in the order book response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderLevel {
    /// Price at this level.
    pub price: String,
    /// Size available at this level.
    pub size: String,
}

/// Last trade price response from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct LastTradeResponse {
    /// Price of the most recent trade.
    pub price: String,
}

/// Order submission request body.
#[derive(Debug, Clone, Serialize)]
struct SubmitOrderRequest<'a> {
    token_id: &'a str,
    side: String,
    price: Decimal,
    size: Decimal,
}

/// Order submission response body.
///
/// Always parsed structurally; no free-form evaluation of the payload.
#[derive(Debug, Clone, Deserialize)]
struct SubmitOrderResponse {
    #[serde(rename = "orderID")]
    order_id: Option<String>,
    #[serde(rename = "errorMsg")]
    error_msg: Option<String>,
}

impl ClobClient {
    /// Create a new client from config with tuned HTTP settings.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(500))
            // TCP_NODELAY for low-latency (disable Nagle's algorithm)
            .tcp_nodelay(true)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()?;

        Ok(Self {
            http,
            clob_url: config.clob_url.clone(),
            dry_run: config.dry_run,
        })
    }

    /// Get the CLOB base URL.
    pub fn clob_url(&self) -> &str {
        &self.clob_url
    }

    /// Whether the client is in simulation mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Exchange for ClobClient {
    #[instrument(skip(self), fields(token_id = %token_id))]
    async fn order_book(&self, token_id: &str) -> Result<RawBook, MarketError> {
        let start = std::time::Instant::now();
        let url = format!("{}/book", self.clob_url);

        let response = self
            .http
            .get(&url)
            .query(&[("token_id", token_id)])
            .send()
            .await
            .map_err(|e| MarketError::BookUnavailable {
                token_id: token_id.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(MarketError::BookUnavailable {
                token_id: token_id.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let book: OrderBookResponse = response
            .json()
            .await
            .map_err(|e| MarketError::ParseError(format!("failed to parse order book: {e}")))?;

        crate::metrics::record_book_fetch_latency(start);

        Ok(RawBook {
            bids: parse_levels(book.bids),
            asks: parse_levels(book.asks),
        })
    }

    #[instrument(skip(self), fields(token_id = %token_id))]
    async fn last_trade_price(&self, token_id: &str) -> Result<Decimal, MarketError> {
        let url = format!("{}/last-trade-price", self.clob_url);

        let response = self
            .http
            .get(&url)
            .query(&[("token_id", token_id)])
            .send()
            .await
            .map_err(|e| MarketError::PriceUnavailable {
                token_id: token_id.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(MarketError::PriceUnavailable {
                token_id: token_id.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let trade: LastTradeResponse = response
            .json()
            .await
            .map_err(|e| MarketError::ParseError(format!("failed to parse trade price: {e}")))?;

        trade
            .price
            .parse()
            .map_err(|e| MarketError::ParseError(format!("bad price '{}': {e}", trade.price)))
    }

    #[instrument(skip(self, params), fields(side = %params.side, price = %params.price))]
    async fn submit_order(&self, params: &OrderParams) -> Result<String, TradingError> {
        params.validate().map_err(TradingError::InvalidParams)?;

        if self.dry_run {
            let order_id = format!("dry-{}", DRY_RUN_SEQ.fetch_add(1, Ordering::Relaxed));
            info!(
                order_id = %order_id,
                side = %params.side,
                price = %params.price,
                size = %params.size,
                "DRY RUN - order not sent"
            );
            return Ok(order_id);
        }

        let url = format!("{}/order", self.clob_url);
        let body = SubmitOrderRequest {
            token_id: &params.token_id,
            side: params.side.to_string(),
            price: params.price,
            size: params.size,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TradingError::SubmissionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TradingError::SubmissionFailed(format!(
                "HTTP {status}: {text}"
            )));
        }

        let submitted: SubmitOrderResponse = response
            .json()
            .await
            .map_err(|e| TradingError::SubmissionFailed(format!("bad response: {e}")))?;

        match submitted.order_id {
            Some(order_id) => {
                debug!(order_id = %order_id, "order accepted");
                Ok(order_id)
            }
            None => Err(TradingError::OrderRejected {
                reason: submitted
                    .error_msg
                    .unwrap_or_else(|| "no order id in response".to_string()),
            }),
        }
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn cancel_order(&self, order_id: &str) -> Result<(), TradingError> {
        if self.dry_run {
            info!(order_id = %order_id, "DRY RUN - cancel not sent");
            return Ok(());
        }

        let url = format!("{}/order", self.clob_url);

        let response = self
            .http
            .delete(&url)
            .json(&serde_json::json!({ "orderID": order_id }))
            .send()
            .await
            .map_err(|e| TradingError::CancelFailed {
                order_id: order_id.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TradingError::CancelFailed {
                order_id: order_id.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        Ok(())
    }
}

/// Parse wire levels, dropping malformed or zero-size entries.
fn parse_levels(levels: Option<Vec<OrderLevel>>) -> Vec<PriceLevel> {
    levels
        .unwrap_or_default()
        .into_iter()
        .filter_map(|level| {
            let price: Decimal = level.price.parse().ok()?;
            let size: Decimal = level.size.parse().ok()?;
            if size > Decimal::ZERO {
                Some(PriceLevel { price, size })
            } else {
                None
            }
        })
        .collect()
}
