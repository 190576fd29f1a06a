//! Market-condition evaluation.
//!
//! [`metrics`] derives spread, imbalance, pressure, and concentration
//! figures from a book snapshot; [`evaluator`] runs the ordered rule
//! cascade that turns them into a favorability verdict.

pub mod evaluator;
pub mod metrics;

pub use evaluator::{Evaluator, Verdict};
pub use metrics::{compute_metrics, MarketMetrics};
