//! Polymarket market-maker binary.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use polymarket_mm::engine::Engine;
use polymarket_mm::market::{ClobClient, Exchange};
use polymarket_mm::notify::Notifier;
use polymarket_mm::orderbook::build_snapshot;
use polymarket_mm::signal::Evaluator;
use polymarket_mm::{metrics, Config};

#[derive(Parser)]
#[command(name = "polymarket-mm", version, about = "Market maker for a single Polymarket outcome")]
struct Args {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the market-making loop (default)
    Run {
        /// Override the DRY_RUN setting from the environment
        #[arg(long)]
        dry_run: Option<bool>,
    },
    /// Validate configuration and print a summary
    CheckConfig,
    /// Fetch the book once, classify it, and print the verdict
    Evaluate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose);

    match args.command.unwrap_or(Command::Run { dry_run: None }) {
        Command::Run { dry_run } => run(dry_run).await,
        Command::CheckConfig => check_config(),
        Command::Evaluate => evaluate().await,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().context("failed to load configuration from environment")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    Ok(config)
}

async fn run(dry_run_override: Option<bool>) -> anyhow::Result<()> {
    let mut config = load_config()?;
    if let Some(dry_run) = dry_run_override {
        config.dry_run = dry_run;
    }

    if config.metrics_enabled {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("failed to start metrics exporter")?;
        metrics::init_metrics();
        info!(addr = %addr, "metrics exporter listening");
    }

    let client = ClobClient::new(&config).context("failed to build HTTP client")?;
    let notifier = Notifier::new(&config);

    info!(
        token_id = %config.token_id,
        dry_run = config.dry_run,
        poll_interval_ms = config.poll_interval_ms,
        "starting market maker"
    );

    let mut engine = Engine::new(config, client, notifier);
    engine.run().await?;

    Ok(())
}

fn check_config() -> anyhow::Result<()> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e:#}");
            return Err(e);
        }
    };

    println!("Configuration OK");
    println!("  token_id:            {}", config.token_id);
    println!("  notional_budget:     {}", config.notional_budget);
    println!("  slippage_buffer:     {}", config.slippage_buffer);
    println!("  imbalance_threshold: {}", config.imbalance_threshold);
    println!("  volume_threshold:    {}", config.volume_threshold);
    println!("  price_levels:        {}", config.price_levels);
    println!("  spread_multiplier:   {}", config.spread_multiplier);
    println!("  poll_interval_ms:    {}", config.poll_interval_ms);
    println!("  clob_url:            {}", config.clob_url);
    println!("  dry_run:             {}", config.dry_run);
    println!(
        "  telegram:            {}",
        if config.telegram_bot_token.is_some() && config.telegram_chat_id.is_some() {
            "configured"
        } else {
            "log-only"
        }
    );
    println!(
        "  metrics:             {}",
        if config.metrics_enabled {
            format!("port {}", config.metrics_port)
        } else {
            "disabled".to_string()
        }
    );

    Ok(())
}

async fn evaluate() -> anyhow::Result<()> {
    let config = load_config()?;
    let client = ClobClient::new(&config).context("failed to build HTTP client")?;

    let raw = client.order_book(&config.token_id).await?;
    let snapshot = build_snapshot(&config.token_id, raw)?;
    let verdict = Evaluator::new(&config).evaluate(&snapshot);

    println!(
        "{}: {}",
        if verdict.is_favorable {
            "FAVORABLE"
        } else {
            "UNFAVORABLE"
        },
        verdict.reason
    );

    if let Some(m) = verdict.metrics {
        println!("  spread:                 {}", m.spread);
        println!("  mid_price:              {}", m.mid_price);
        println!("  best_bid / best_ask:    {} / {}", m.best_bid, m.best_ask);
        println!(
            "  near volume (bid/ask):  {} / {}",
            m.near_bid_volume, m.near_ask_volume
        );
        println!("  volume_imbalance:       {:.4}", m.volume_imbalance);
        println!(
            "  pressure (bid/ask):     {:.4} / {:.4}",
            m.bid_pressure, m.ask_pressure
        );
        println!(
            "  concentration (b/a):    {:.4} / {:.4}",
            m.best_bid_concentration, m.best_ask_concentration
        );
    }

    Ok(())
}
