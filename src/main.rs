//! TICKERWATCH — Screener Change Monitor
//!
//! Entry point. Loads configuration, initialises structured logging,
//! opens the snapshot store, and runs the fetch→parse→diff→report→commit
//! loop with graceful shutdown.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use tickerwatch::config::{AppConfig, StorageBackend};
use tickerwatch::dashboard;
use tickerwatch::dashboard::routes::WatchState;
use tickerwatch::engine::monitor::Monitor;
use tickerwatch::engine::parser::RecordParser;
use tickerwatch::report::LogReporter;
use tickerwatch::source::finviz::FinvizClient;
use tickerwatch::storage::{MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore};
use tickerwatch::types::MonitorError;

const BANNER: &str = r#"
 _____ ___ ____ _  _______ ______        ___  _____ ____ _   _
|_   _|_ _/ ___| |/ / ____|  _ \ \      / / \|_   _/ ___| | | |
  | |  | | |   | ' /|  _| | |_) \ \ /\ / / _ \ | || |   | |_| |
  | |  | | |___| . \| |___|  _ < \ V  V / ___ \| || |___|  _  |
  |_| |___\____|_|\_\_____|_| \_\ \_/\_/_/   \_\_| \____|_| |_|

  Screener Change Monitor
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        url = %cfg.monitor.screener_url(),
        poll_interval_ms = cfg.monitor.poll_interval_ms,
        min_columns = cfg.monitor.min_columns,
        "TICKERWATCH starting up"
    );

    // -- Initialise components -------------------------------------------

    let store: Box<dyn SnapshotStore> = match cfg.storage.backend {
        StorageBackend::Sqlite => {
            Box::new(SqliteSnapshotStore::open(&cfg.storage.path).await?)
        }
        StorageBackend::Memory => {
            warn!("In-memory snapshot store: state will not survive a restart");
            Box::new(MemorySnapshotStore::new())
        }
    };

    let source = FinvizClient::new(&cfg.monitor)?;
    let parser = RecordParser::new(cfg.monitor.min_columns)?;
    let monitor = Monitor::new(Box::new(source), parser, store, Box::new(LogReporter));

    // Shared observation state for the dashboard
    let state = Arc::new(WatchState::new());
    if cfg.dashboard.enabled {
        dashboard::spawn_dashboard(state.clone(), cfg.dashboard.port)?;
    }

    // -- Main loop -------------------------------------------------------

    let mut interval =
        tokio::time::interval(Duration::from_millis(cfg.monitor.poll_interval_ms));
    // A cycle overrunning the interval skips ticks rather than stacking them;
    // exactly one cycle is ever in flight.
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        poll_interval_ms = cfg.monitor.poll_interval_ms,
        "Entering monitor loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                info!("Monitor run starting");
                match monitor.run_cycle().await {
                    Ok(outcome) => {
                        state.record_success(&outcome.report, &outcome.symbols);
                        info!(report = %outcome.report, "Monitor run complete");
                    }
                    Err(e) => {
                        state.record_failure(&e.to_string());
                        match e {
                            MonitorError::EmptyResult => {
                                warn!("No tickers fetched. Check URL or connectivity.");
                            }
                            other => {
                                warn!(error = %other, "Cycle failed — snapshot left untouched");
                            }
                        }
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("TICKERWATCH shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tickerwatch=info"));

    let json_logging = std::env::var("TICKERWATCH_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
