//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// Constructed once at startup and passed by reference into each component;
/// there is no ambient global state.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Instrument ===
    /// CLOB token ID of the single outcome being quoted.
    pub token_id: String,

    // === Trading Parameters ===
    /// Notional budget in USDC used to derive the share count.
    pub notional_budget: Decimal,

    /// Slippage buffer added to the last trade price when sizing.
    pub slippage_buffer: Decimal,

    // === Favorability Thresholds ===
    /// Near-spread volume imbalance above which buy pressure is strong.
    #[serde(default = "default_imbalance_threshold")]
    pub imbalance_threshold: f64,

    /// Price-pressure level above which a side is considered pushing.
    #[serde(default = "default_volume_threshold")]
    pub volume_threshold: f64,

    /// Number of best levels per side used for price pressure.
    #[serde(default = "default_price_levels")]
    pub price_levels: usize,

    /// Multiple of the spread defining the near-spread volume window.
    #[serde(default = "default_spread_multiplier")]
    pub spread_multiplier: Decimal,

    // === Loop Timing ===
    /// Poll cadence of the control loop in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Backoff after a cycle-level error, in seconds.
    #[serde(default = "default_error_backoff_secs")]
    pub error_backoff_secs: u64,

    /// Minimum interval between heartbeat notifications, in seconds.
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    // === Operation Modes ===
    /// Simulation mode (no real orders).
    #[serde(default = "default_true")]
    pub dry_run: bool,

    // === CLOB Endpoint ===
    /// CLOB API base URL.
    #[serde(default = "default_clob_url")]
    pub clob_url: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Notifications ===
    /// Telegram bot token; notifications are log-only when unset.
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat ID to deliver notifications to.
    #[serde(default)]
    pub telegram_chat_id: Option<String>,

    // === Observability ===
    /// Enable the Prometheus metrics exporter.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Port for the Prometheus metrics exporter.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_imbalance_threshold() -> f64 {
    3.0
}

fn default_volume_threshold() -> f64 {
    0.4
}

fn default_price_levels() -> usize {
    3
}

fn default_spread_multiplier() -> Decimal {
    Decimal::new(15, 1) // 1.5
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_error_backoff_secs() -> u64 {
    10
}

fn default_heartbeat_interval_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_clob_url() -> String {
    "https://clob.polymarket.com".to_string()
}

fn default_http_timeout_ms() -> u64 {
    5_000
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    ///
    /// Missing required fields (`TOKEN_ID`, `NOTIONAL_BUDGET`,
    /// `SLIPPAGE_BUFFER`) are a fatal startup error.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.token_id.is_empty() {
            return Err("TOKEN_ID is required".to_string());
        }

        if self.notional_budget <= Decimal::ZERO {
            return Err("NOTIONAL_BUDGET must be positive".to_string());
        }

        if self.slippage_buffer < Decimal::ZERO {
            return Err("SLIPPAGE_BUFFER must not be negative".to_string());
        }

        if self.imbalance_threshold <= 0.0 {
            return Err("IMBALANCE_THRESHOLD must be positive".to_string());
        }

        if self.price_levels < 2 {
            return Err("PRICE_LEVELS must be at least 2".to_string());
        }

        if self.spread_multiplier <= Decimal::ZERO {
            return Err("SPREAD_MULTIPLIER must be positive".to_string());
        }

        if self.heartbeat_interval_secs == 0 {
            return Err("HEARTBEAT_INTERVAL_SECS must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_config() -> Config {
        Config {
            token_id: "token-123".to_string(),
            notional_budget: dec!(100),
            slippage_buffer: dec!(0.01),
            imbalance_threshold: default_imbalance_threshold(),
            volume_threshold: default_volume_threshold(),
            price_levels: default_price_levels(),
            spread_multiplier: default_spread_multiplier(),
            poll_interval_ms: default_poll_interval_ms(),
            error_backoff_secs: default_error_backoff_secs(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            dry_run: true,
            clob_url: default_clob_url(),
            http_timeout_ms: default_http_timeout_ms(),
            telegram_bot_token: None,
            telegram_chat_id: None,
            metrics_enabled: true,
            metrics_port: default_metrics_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_imbalance_threshold(), 3.0);
        assert_eq!(default_volume_threshold(), 0.4);
        assert_eq!(default_price_levels(), 3);
        assert_eq!(default_spread_multiplier(), dec!(1.5));
        assert_eq!(default_poll_interval_ms(), 1_000);
        assert_eq!(default_error_backoff_secs(), 10);
        assert_eq!(default_heartbeat_interval_secs(), 60);
        assert!(default_true());
    }

    #[test]
    fn validate_accepts_test_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_token_id() {
        let mut config = test_config();
        config.token_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_budget() {
        let mut config = test_config();
        config.notional_budget = Decimal::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_single_pressure_level() {
        let mut config = test_config();
        config.price_levels = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_slippage_buffer() {
        let mut config = test_config();
        config.slippage_buffer = dec!(-0.01);
        assert!(config.validate().is_err());
    }
}
