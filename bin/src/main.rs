//! barmill CLI - Turn tick data into time, tick, value and volume bars.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "barmill")]
#[command(about = "Turn tick data into time, tick, value and volume bars", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a JSON pipeline definition
    Run {
        /// Path to the pipeline definition
        pipeline: PathBuf,

        /// Root directory of the local storage backend. Defaults to
        /// $BARMILL_STORAGE_ROOT, then the current directory.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Print the run record as JSON
        #[arg(long)]
        output_json: bool,
    },

    /// Aggregate a tick file into bars
    Aggregate {
        /// Input tick file (parquet, csv, json or ndjson)
        input: PathBuf,

        /// Sampling clock (time, tick, value, volume)
        #[arg(short, long, default_value = "time")]
        unit: String,

        /// Bucket width in units of the clock
        #[arg(long, default_value = "3600000")]
        quantity: f64,

        /// Output file path. Defaults to <input>_bars.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format. Defaults to the output extension, then the input format.
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// List registered pipeline tasks
    Tasks,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Run {
            pipeline,
            root,
            output_json,
        } => commands::run::run_pipeline(&pipeline, root, output_json, cli.quiet),
        Commands::Aggregate {
            input,
            unit,
            quantity,
            output,
            format,
        } => commands::aggregate::aggregate(&input, &unit, quantity, output, format, cli.quiet),
        Commands::Tasks => commands::tasks::list_tasks(),
    }
}

/// Installs the log subscriber. `RUST_LOG` overrides the verbosity flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
