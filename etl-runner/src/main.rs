//! Runs one stage of the snapshot ETL and prints its output as JSON.
//!
//! Both stages run on a single-threaded runtime: tables are processed one after the other.

use std::io::Read;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use etl::error::EtlError;
use etl::pipeline::TransformEvent;
use etl::types::TimePartition;
use etl_config::shared::RunnerConfig;
use etl_telemetry::tracing::init_tracing;
use tracing::error;

use crate::config::load_runner_config;
use crate::core::{run_extract, run_transform};
use crate::error::{RunnerError, RunnerResult};

mod config;
mod core;
mod error;

#[derive(Parser, Debug)]
#[command(name = "etl-runner", about = "Snapshot ETL stage runner")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Snapshot every configured table into the raw bucket and record changed rows
    Extract {
        /// Partition to write under instead of the current UTC time, e.g. `2024/01/02/03:04:05/`
        #[arg(long)]
        time_prefix: Option<String>,
    },
    /// Convert the snapshots of one partition to Parquet in the processed bucket
    Transform {
        /// Partition to convert. When absent, a `{"time_prefix": ...}` event is read from stdin
        #[arg(long)]
        time_prefix: Option<String>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{}", err.render_report());
            ExitCode::FAILURE
        }
    }
}

fn run() -> RunnerResult<()> {
    let args = Args::parse();
    let config = load_runner_config()?;

    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME")).map_err(RunnerError::config)?;

    let result = run_command(args.command, config);
    if let Err(err) = &result {
        error!("{err}");
    }

    result
}

fn run_command(command: Command, config: RunnerConfig) -> RunnerResult<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let output = match command {
        Command::Extract { time_prefix } => {
            let output =
                runtime.block_on(run_extract(config, time_prefix.map(TimePartition::from)))?;
            serde_json::to_string(&output).map_err(EtlError::from)?
        }
        Command::Transform { time_prefix } => {
            let event = match time_prefix {
                Some(time_prefix) => TransformEvent {
                    time_prefix: TimePartition::from(time_prefix),
                },
                None => read_event()?,
            };
            let output = runtime.block_on(run_transform(config, event))?;
            serde_json::to_string(&output).map_err(EtlError::from)?
        }
    };

    println!("{output}");

    Ok(())
}

/// Reads a [`TransformEvent`] from stdin.
fn read_event() -> RunnerResult<TransformEvent> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    Ok(serde_json::from_str(&input).map_err(EtlError::from)?)
}
