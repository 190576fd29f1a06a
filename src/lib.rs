//! Market-making bot for a single Polymarket binary market.
//!
//! The bot continuously quotes a two-sided spread around the book of one
//! instrument. Each second it fetches the order book, scores how favorable
//! current conditions are, and either rests a paired ask/bid quote at the
//! second-best level on each side or pulls its quotes and goes flat.
//!
//! # Control flow
//!
//! ```text
//! poll book ──▶ evaluate favorability ──▶ favorable? ──▶ quote pair resting
//!                                              │
//!                                              └──▶ unfavorable / price drift
//!                                                        └──▶ cancel + flat
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Exchange trait, CLOB client, and mock for tests
//! - [`orderbook`]: Depth snapshot building and accessors
//! - [`signal`]: Market metrics and the favorability rule cascade
//! - [`trading`]: Order types, quote sizing, and the quote lifecycle
//! - [`engine`]: The polling control loop and heartbeat
//! - [`notify`]: Best-effort operator notifications (log + Telegram)
//! - [`metrics`]: Prometheus counters and histograms

pub mod config;
pub mod engine;
pub mod error;
pub mod market;
pub mod metrics;
pub mod notify;
pub mod orderbook;
pub mod signal;
pub mod trading;

pub use config::Config;
pub use error::{BotError, Result};
