//! shiptrackd: logs vessel positions from the aprs.fi API into SQLite.
//!
//! Reads `shiptrack.toml` (or the path given with `--config`), overlaid by
//! `SHIPTRACK_*` environment variables.
//!
//! ```text
//! shiptrackd track --mmsi 230636000 --name "WASA EXPRESS"
//! SHIPTRACK_API_KEY=... shiptrackd run
//! shiptrackd positions --imo 8000226
//! ```

mod settings;

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use settings::DaemonConfig;
use shiptrack_aprs::AprsClient;
use shiptrack_core::{Vessel, store::VesselStore};
use shiptrack_ingest::{CycleOutcome, RunOutcome, Scheduler};
use shiptrack_store_sqlite::{SqliteConnector, SqliteStore};
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Vessel position logger")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "shiptrack.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Run ingestion cycles until interrupted (default).
  Run,
  /// Run a single ingestion cycle and exit.
  Once,
  /// Register a vessel for tracking.
  Track {
    #[arg(long)]
    mmsi: i64,
    /// Name to record until the first report arrives.
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    imo:  Option<i64>,
  },
  /// Print the retained position history of an IMO, one JSON object per line.
  Positions {
    #[arg(long)]
    imo: i64,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let command = cli.command.unwrap_or(Command::Run);

  let cfg = DaemonConfig::load(&cli.config)
    .with_context(|| format!("failed to read configuration from {:?}", cli.config))?;
  cfg.validate(matches!(command, Command::Run | Command::Once))?;

  match command {
    Command::Run => run(&cfg).await,
    Command::Once => once(&cfg).await,
    Command::Track { mmsi, name, imo } => track(&cfg, mmsi, name, imo).await,
    Command::Positions { imo } => positions(&cfg, imo).await,
  }
}

type DaemonScheduler = Scheduler<SqliteConnector, AprsClient>;

fn scheduler(cfg: &DaemonConfig) -> anyhow::Result<DaemonScheduler> {
  let client = AprsClient::new(cfg.aprs()).context("failed to build API client")?;
  let path = cfg
    .prepare_store_path()
    .context("failed to create the store directory")?;
  let connector = SqliteConnector::new(path);
  info!(store = ?connector.path(), "using vessel store");
  Ok(Scheduler::new(connector, client, cfg.ingest()))
}

async fn open_store(cfg: &DaemonConfig) -> anyhow::Result<SqliteStore> {
  let path = cfg
    .prepare_store_path()
    .context("failed to create the store directory")?;
  SqliteStore::open(&path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}

// ─── Commands ────────────────────────────────────────────────────────────────

async fn run(cfg: &DaemonConfig) -> anyhow::Result<ExitCode> {
  let scheduler = scheduler(cfg)?;
  let Some(mut worker) = scheduler.start() else {
    bail!("ingestion is already running");
  };

  let outcome = tokio::select! {
    joined = &mut worker => joined.context("ingestion worker failed")?,
    signal = tokio::signal::ctrl_c() => {
      signal.context("failed to listen for Ctrl-C")?;
      info!("interrupt received, finishing current step");
      scheduler.stop();
      worker.await.context("ingestion worker failed")?
    }
  };

  Ok(match outcome {
    RunOutcome::Stopped => ExitCode::SUCCESS,
    RunOutcome::Halted => ExitCode::FAILURE,
  })
}

async fn once(cfg: &DaemonConfig) -> anyhow::Result<ExitCode> {
  match scheduler(cfg)?.run_once().await {
    CycleOutcome::Completed(_) => Ok(ExitCode::SUCCESS),
    CycleOutcome::Skipped(e) => {
      warn!(error = %e, "nothing was ingested");
      Ok(ExitCode::SUCCESS)
    }
    CycleOutcome::Fatal(e) => {
      error!(error = %e, "cycle failed");
      Ok(ExitCode::FAILURE)
    }
  }
}

async fn track(
  cfg: &DaemonConfig,
  mmsi: i64,
  name: Option<String>,
  imo: Option<i64>,
) -> anyhow::Result<ExitCode> {
  let store = open_store(cfg).await?;

  if store.track_vessel(mmsi).await? {
    info!(mmsi, "now tracking vessel");
  } else {
    info!(mmsi, "vessel already tracked");
  }

  if name.is_some() || imo.is_some() {
    let current = store.get_vessel(mmsi).await?;
    let mut vessel = current.unwrap_or_else(|| Vessel::new(mmsi));
    if let Some(name) = name {
      vessel.name = name;
    }
    if let Some(imo) = imo {
      vessel.imo = imo;
    }
    if !store.upsert_vessel(&vessel).await? {
      bail!("vessel {mmsi} disappeared before its details could be saved");
    }
  }

  Ok(ExitCode::SUCCESS)
}

async fn positions(cfg: &DaemonConfig, imo: i64) -> anyhow::Result<ExitCode> {
  let store = open_store(cfg).await?;
  for sample in store.positions(imo).await? {
    println!("{}", serde_json::to_string(&sample)?);
  }
  Ok(ExitCode::SUCCESS)
}
