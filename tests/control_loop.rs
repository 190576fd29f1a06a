//! End-to-end cycle tests driving the engine against a scripted venue.

use polymarket_mm::config::Config;
use polymarket_mm::engine::Engine;
use polymarket_mm::error::TradingError;
use polymarket_mm::market::mock::{MockExchange, MockFailures};
use polymarket_mm::notify::Notifier;
use polymarket_mm::orderbook::PriceLevel;
use polymarket_mm::trading::Side;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn test_config() -> Config {
    Config {
        token_id: "token-123".to_string(),
        notional_budget: dec!(100),
        slippage_buffer: dec!(0.01),
        imbalance_threshold: 3.0,
        volume_threshold: 0.4,
        price_levels: 3,
        spread_multiplier: dec!(1.5),
        poll_interval_ms: 1_000,
        error_backoff_secs: 10,
        heartbeat_interval_secs: 60,
        dry_run: true,
        clob_url: "https://clob.polymarket.com".to_string(),
        http_timeout_ms: 5_000,
        telegram_bot_token: None,
        telegram_chat_id: None,
        metrics_enabled: false,
        metrics_port: 9090,
        rust_log: "info".to_string(),
        verbose: false,
    }
}

fn engine(mock: &MockExchange) -> Engine<MockExchange> {
    Engine::new(test_config(), mock.clone(), Notifier::log_only())
}

fn levels(levels: &[(Decimal, Decimal)]) -> Vec<PriceLevel> {
    levels.iter().map(|&(p, s)| PriceLevel::new(p, s)).collect()
}

/// Tight book with a 2:1 buyer imbalance; classifies favorable.
fn set_favorable_book(mock: &MockExchange) {
    mock.set_book(
        levels(&[
            (dec!(0.500), dec!(200)),
            (dec!(0.499), dec!(100)),
            (dec!(0.498), dec!(50)),
        ]),
        levels(&[
            (dec!(0.510), dec!(100)),
            (dec!(0.511), dec!(50)),
            (dec!(0.512), dec!(25)),
        ]),
    );
}

/// Book with a wide-ish spread and mild imbalance; classifies neutral.
fn set_neutral_book(mock: &MockExchange) {
    mock.set_book(
        levels(&[
            (dec!(0.50), dec!(100)),
            (dec!(0.49), dec!(50)),
            (dec!(0.48), dec!(20)),
        ]),
        levels(&[
            (dec!(0.52), dec!(10)),
            (dec!(0.53), dec!(40)),
            (dec!(0.54), dec!(60)),
        ]),
    );
}

#[tokio::test]
async fn favorable_market_places_ask_then_bid_at_second_best() {
    let mock = MockExchange::new();
    set_favorable_book(&mock);
    mock.set_last_price(dec!(0.50));

    let mut engine = engine(&mock);
    engine.cycle().await.unwrap();

    let submitted = mock.submitted();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0].side, Side::Sell);
    assert_eq!(submitted[0].price, dec!(0.511));
    assert_eq!(submitted[1].side, Side::Buy);
    assert_eq!(submitted[1].price, dec!(0.499));

    // floor(100 / 0.51) = 196 shares across the pair.
    assert_eq!(submitted[0].size.round_dp(1), dec!(95.6));
    assert_eq!(submitted[0].size, submitted[1].size);

    assert!(engine.controller().is_quoting());
    assert_eq!(engine.controller().position().anchor_price, Some(dec!(0.50)));
}

#[tokio::test]
async fn resting_quotes_are_not_replaced_while_price_holds() {
    let mock = MockExchange::new();
    set_favorable_book(&mock);
    mock.set_last_price(dec!(0.50));

    let mut engine = engine(&mock);
    engine.cycle().await.unwrap();
    engine.cycle().await.unwrap();
    engine.cycle().await.unwrap();

    assert_eq!(mock.submitted().len(), 2);
    assert!(mock.cancelled().is_empty());
}

#[tokio::test]
async fn price_drift_cancels_both_quotes_before_replacing() {
    let mock = MockExchange::new();
    set_favorable_book(&mock);
    mock.set_last_price(dec!(0.50));

    let mut engine = engine(&mock);
    engine.cycle().await.unwrap();

    let ask_id = engine.controller().position().ask.clone().unwrap().id;
    let bid_id = engine.controller().position().bid.clone().unwrap().id;

    mock.set_last_price(dec!(0.52));
    engine.cycle().await.unwrap();

    // Ask cancelled first, then bid, then the fresh pair placed.
    assert_eq!(mock.cancelled(), vec![ask_id.clone(), bid_id.clone()]);
    let calls = mock.calls();
    let cancel_ask = calls.iter().position(|c| *c == format!("cancel {ask_id}"));
    let cancel_bid = calls.iter().position(|c| *c == format!("cancel {bid_id}"));
    let resubmit = calls
        .iter()
        .enumerate()
        .filter(|(_, c)| c.starts_with("submit"))
        .nth(2)
        .map(|(i, _)| i);
    assert!(cancel_ask < cancel_bid);
    assert!(cancel_bid < resubmit);

    assert_eq!(mock.submitted().len(), 4);
    assert!(engine.controller().is_quoting());
    assert_eq!(engine.controller().position().anchor_price, Some(dec!(0.52)));
}

#[tokio::test]
async fn turning_unfavorable_withdraws_to_flat() {
    let mock = MockExchange::new();
    set_favorable_book(&mock);
    mock.set_last_price(dec!(0.50));

    let mut engine = engine(&mock);
    engine.cycle().await.unwrap();
    assert!(engine.controller().is_quoting());

    set_neutral_book(&mock);
    engine.cycle().await.unwrap();

    assert!(!engine.controller().is_quoting());
    assert_eq!(mock.cancelled().len(), 2);
    assert_eq!(mock.submitted().len(), 2);
}

#[tokio::test]
async fn unavailable_book_counts_as_unfavorable_and_withdraws() {
    let mock = MockExchange::new();
    set_favorable_book(&mock);
    mock.set_last_price(dec!(0.50));

    let mut engine = engine(&mock);
    engine.cycle().await.unwrap();
    assert!(engine.controller().is_quoting());

    mock.set_failures(MockFailures {
        order_book: true,
        ..Default::default()
    });
    engine.cycle().await.unwrap();

    assert!(!engine.controller().is_quoting());
    assert_eq!(mock.cancelled().len(), 2);
}

#[tokio::test]
async fn missing_trade_price_blocks_placement() {
    let mock = MockExchange::new();
    set_favorable_book(&mock);
    mock.set_failures(MockFailures {
        last_trade_price: true,
        ..Default::default()
    });

    let mut engine = engine(&mock);
    engine.cycle().await.unwrap();

    assert!(mock.submitted().is_empty());
    assert!(!engine.controller().is_quoting());
}

#[tokio::test]
async fn failed_ask_leg_still_tracks_the_resting_bid() {
    let mock = MockExchange::new();
    set_favorable_book(&mock);
    mock.set_last_price(dec!(0.50));
    mock.queue_submit(Err(TradingError::SubmissionFailed("rejected".to_string())));

    let mut engine = engine(&mock);
    engine.cycle().await.unwrap();

    let position = engine.controller().position();
    assert!(position.ask.is_none());
    assert!(position.bid.is_some());
    assert!(engine.controller().is_quoting());
    assert_eq!(mock.submitted().len(), 1);
    assert_eq!(mock.submitted()[0].side, Side::Buy);
}

#[tokio::test]
async fn both_legs_failing_leaves_the_engine_flat() {
    let mock = MockExchange::new();
    set_favorable_book(&mock);
    mock.set_last_price(dec!(0.50));
    mock.queue_submit(Err(TradingError::SubmissionFailed("rejected".to_string())));
    mock.queue_submit(Err(TradingError::SubmissionFailed("rejected".to_string())));

    let mut engine = engine(&mock);
    engine.cycle().await.unwrap();

    assert!(!engine.controller().is_quoting());
    assert!(engine.controller().position().anchor_price.is_none());

    // The next cycle retries placement from scratch.
    engine.cycle().await.unwrap();
    assert_eq!(mock.submitted().len(), 2);
    assert!(engine.controller().is_quoting());
}

#[tokio::test]
async fn shallow_book_is_never_quoted() {
    let mock = MockExchange::new();
    // One level per side: favorability aside, there is no second-best
    // price to quote at.
    mock.set_book(
        levels(&[(dec!(0.500), dec!(200))]),
        levels(&[(dec!(0.510), dec!(100))]),
    );
    mock.set_last_price(dec!(0.50));

    let mut engine = engine(&mock);
    engine.cycle().await.unwrap();

    assert!(mock.submitted().is_empty());
    assert!(!engine.controller().is_quoting());
}
