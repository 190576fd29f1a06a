//! Prometheus metrics for the trading loop.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Control loop cycles counter metric name.
pub const METRIC_CYCLES: &str = "mm_cycles_total";
/// Heartbeats emitted counter metric name.
pub const METRIC_HEARTBEATS: &str = "mm_heartbeats_total";
/// Favorable verdicts counter metric name.
pub const METRIC_FAVORABLE_VERDICTS: &str = "mm_favorable_verdicts_total";
/// Unfavorable verdicts counter metric name.
pub const METRIC_UNFAVORABLE_VERDICTS: &str = "mm_unfavorable_verdicts_total";
/// Orders placed counter metric name.
pub const METRIC_ORDERS_PLACED: &str = "mm_orders_placed_total";
/// Orders cancelled counter metric name.
pub const METRIC_ORDERS_CANCELLED: &str = "mm_orders_cancelled_total";
/// Order placement/cancel failures counter metric name.
pub const METRIC_ORDER_FAILURES: &str = "mm_order_failures_total";
/// Order book fetch latency metric name.
pub const METRIC_BOOK_FETCH_LATENCY: &str = "mm_book_fetch_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_CYCLES, "Total control loop cycles run");
    describe_counter!(METRIC_HEARTBEATS, "Total heartbeat notifications emitted");
    describe_counter!(
        METRIC_FAVORABLE_VERDICTS,
        "Total cycles classified as favorable"
    );
    describe_counter!(
        METRIC_UNFAVORABLE_VERDICTS,
        "Total cycles classified as unfavorable"
    );
    describe_counter!(METRIC_ORDERS_PLACED, "Total orders placed");
    describe_counter!(METRIC_ORDERS_CANCELLED, "Total orders cancelled");
    describe_counter!(
        METRIC_ORDER_FAILURES,
        "Total order placements or cancels that failed"
    );
    describe_histogram!(
        METRIC_BOOK_FETCH_LATENCY,
        "Order book fetch latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Increment the cycle counter.
pub fn inc_cycles() {
    counter!(METRIC_CYCLES).increment(1);
}

/// Increment the heartbeat counter.
pub fn inc_heartbeats() {
    counter!(METRIC_HEARTBEATS).increment(1);
}

/// Increment the favorable verdict counter.
pub fn inc_favorable_verdicts() {
    counter!(METRIC_FAVORABLE_VERDICTS).increment(1);
}

/// Increment the unfavorable verdict counter.
pub fn inc_unfavorable_verdicts() {
    counter!(METRIC_UNFAVORABLE_VERDICTS).increment(1);
}

/// Increment the orders placed counter.
pub fn inc_orders_placed() {
    counter!(METRIC_ORDERS_PLACED).increment(1);
}

/// Increment the orders cancelled counter.
pub fn inc_orders_cancelled() {
    counter!(METRIC_ORDERS_CANCELLED).increment(1);
}

/// Increment the order failure counter.
pub fn inc_order_failures() {
    counter!(METRIC_ORDER_FAILURES).increment(1);
}

/// Record order book fetch latency.
pub fn record_book_fetch_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_BOOK_FETCH_LATENCY).record(latency_ms);
}
