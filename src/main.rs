//! opcode-stats CLI
//!
//! Collects opcode-frequency histograms for every contract-calling
//! transaction in a block range.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;
use std::time::Duration;

use opcode_stats::commands::{display_version, execute_collect, validate_output_file, CollectArgs};
use opcode_stats::pipeline::ShutdownSignal;
use opcode_stats::utils::config::DEFAULT_RESULT_CHANNEL_CAPACITY;

/// opcode-stats - opcode histograms over a block range
#[derive(Parser, Debug)]
#[command(name = "opcode-stats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the opcode-stats collector
    Run {
        /// RPC url
        #[arg(short, long, env = "OPCODE_STATS_URL")]
        url: String,

        /// Start block number (defaults to the chain head)
        #[arg(short, long)]
        start_block: Option<u64>,

        /// Output file for data (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite output if exists
        #[arg(short = 'w', long)]
        overwrite: bool,

        /// Concurrent requests
        #[arg(short, long, default_value = "1")]
        concurrency: usize,

        /// Records buffered between workers and the writer
        #[arg(long, default_value_t = DEFAULT_RESULT_CHANNEL_CAPACITY)]
        channel_capacity: usize,

        /// RPC request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },

    /// Validate an output file
    Validate {
        /// Path to newline-delimited JSON output
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging (stderr, so stdout can carry records)
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Run {
            url,
            start_block,
            output,
            overwrite,
            concurrency,
            channel_capacity,
            timeout,
        } => {
            let args = CollectArgs {
                rpc_url: url,
                start_block,
                output,
                overwrite,
                concurrency,
                channel_capacity,
                timeout: Duration::from_secs(timeout),
            };

            let shutdown = ShutdownSignal::new();
            shutdown
                .install_handler()
                .context("Failed to install signal handler")?;

            execute_collect(args, &shutdown)?;
        }

        Commands::Validate { file } => {
            validate_output_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
