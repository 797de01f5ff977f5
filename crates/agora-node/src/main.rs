//! Agora node - one validator-agent process.
//!
//! Wires the registry, transcript store, deliberation orchestrator, and
//! live-event hub together for a single chain, then pumps transcript lines
//! into the hub until interrupted. The replication engine driving the
//! consensus callbacks runs externally.

use agora_consensus::DeliberativeApp;
use agora_deliberation::{Orchestrator, OrchestratorConfig, UnsetOracle};
use agora_realtime::FanoutHub;
use agora_registry::AgentRegistry;
use agora_transcript::{TailerConfig, TranscriptStore, TranscriptTailer};
use agora_types::ChainId;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

/// Agora - AI-deliberated replicated state machine node
#[derive(Parser, Debug)]
#[command(name = "agora-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Chain identifier (overrides config)
    #[arg(long)]
    chain_id: Option<String>,

    /// Data directory (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// This validator's engine-side address (overrides config)
    #[arg(long)]
    validator_address: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = config::Config::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    if let Some(chain_id) = args.chain_id {
        config.chain_id = chain_id;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir.display().to_string();
    }
    if let Some(addr) = args.validator_address {
        config.validator_address = addr;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("agora={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Agora node");
    tracing::info!(
        chain = %config.chain_id,
        data_dir = %config.data_dir,
        validator = %config.validator_address,
        "Node configuration"
    );

    let chain = ChainId::new(config.chain_id.clone());
    let store = TranscriptStore::new(&config.data_dir)
        .with_context(|| format!("opening transcript store in {}", config.data_dir))?;
    let registry = Arc::new(
        AgentRegistry::open(&config.registry_file)
            .with_context(|| format!("opening registry at {}", config.registry_file))?,
    );
    let hub = Arc::new(FanoutHub::new());

    // The oracle backend is provisioned externally; without one, every
    // deliberation degrades to the default verdict and consensus proceeds.
    let orchestrator = Orchestrator::new(
        Arc::new(UnsetOracle),
        store.clone(),
        OrchestratorConfig {
            call_timeout: Duration::from_secs(config.oracle_timeout_secs),
        },
    );
    let app = DeliberativeApp::new(
        chain.clone(),
        config.validator_address.clone(),
        registry,
        orchestrator,
    );
    let (_, params) = app.init(Vec::new())?;
    tracing::info!(app_version = params.version.app, "Callback state machine ready");

    // Pump transcript lines into the live-event hub.
    let tailer = TranscriptTailer::new(
        store.transcript_path(&chain),
        TailerConfig {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        },
    );
    let pump_hub = hub.clone();
    let pump_chain = chain.clone();
    tokio::spawn(async move {
        if let Err(e) = tailer
            .run(move |event| pump_hub.publish(&pump_chain, event))
            .await
        {
            tracing::error!(error = %e, "transcript pump stopped");
        }
    });

    tracing::info!("Node is ready. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    let stats = hub.stats();
    tracing::info!(
        events = stats.total_events,
        dropped = stats.total_dropped,
        "Shutting down"
    );
    Ok(())
}
