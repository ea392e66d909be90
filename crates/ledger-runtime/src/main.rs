//! # Tax Ledger Runtime
//!
//! ```text
//! ledger-runtime replay --genesis genesis.json --script ops.json
//! ledger-runtime check-config
//! ```
//!
//! Configuration comes from `TL_*` environment variables; logs go to stderr,
//! results to stdout.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use ledger_runtime::{build_service, load_script, Genesis, Replayer};
use ledger_telemetry::{gather_metrics, init_telemetry, TelemetryConfig};
use tax_ledger::LedgerConfig;

/// Tax ledger runtime
#[derive(Parser, Debug)]
#[command(name = "ledger-runtime", version)]
#[command(about = "Replay scripted operations against a tax ledger")]
struct Cli {
    /// Log level or filter directive (overrides TL_LOG_LEVEL / RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a ledger from a genesis file and replay a script against it
    Replay {
        /// Genesis JSON: allocations and optional config
        #[arg(long)]
        genesis: PathBuf,

        /// Script JSON: array of operations
        #[arg(long)]
        script: PathBuf,

        /// Reference output per token on liquidation, in basis points
        #[arg(long, default_value = "10000")]
        swap_rate_bps: u32,

        /// Print Prometheus metrics after the summary
        #[arg(long)]
        metrics: bool,
    },

    /// Load and validate the environment configuration, then print it
    CheckConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = cli.log_level {
        telemetry = telemetry.with_log_level(level);
    }
    telemetry.json_logs |= cli.json_logs;
    let _guard = init_telemetry(telemetry).context("initializing telemetry")?;

    match cli.command {
        Command::Replay {
            genesis,
            script,
            swap_rate_bps,
            metrics,
        } => replay(&genesis, &script, swap_rate_bps, metrics),
        Command::CheckConfig => check_config(),
    }
}

fn replay(genesis_path: &Path, script_path: &Path, swap_rate_bps: u32, metrics: bool) -> Result<()> {
    let env_config = LedgerConfig::from_env().context("loading TL_* configuration")?;
    let genesis = Genesis::load(genesis_path)?;
    let config = genesis.config_or(env_config);
    config.validate().context("validating genesis configuration")?;

    let ledger = genesis.build_ledger()?;
    let service = build_service(&config, ledger, swap_rate_bps)?;
    let ops = load_script(script_path)?;
    info!(
        allocations = genesis.allocations.len(),
        operations = ops.len(),
        "Starting replay"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut replayer = Replayer::new(&service, config.owner);
    for op in &ops {
        let step = replayer.step(op);
        if !step.ok {
            warn!(index = step.index, op = step.op, error = ?step.error, "Operation failed");
        }
        serde_json::to_writer(&mut out, step)?;
        writeln!(out)?;
    }

    serde_json::to_writer_pretty(&mut out, &replayer.summary())?;
    writeln!(out)?;

    if metrics {
        write!(out, "{}", gather_metrics()?)?;
    }
    Ok(())
}

fn check_config() -> Result<()> {
    let config = LedgerConfig::from_env().context("loading TL_* configuration")?;
    info!(owner = %config.owner, "Configuration valid");
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
