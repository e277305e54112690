//! Run command implementation.
//!
//! The run command:
//! 1. Validates arguments
//! 2. Opens the output destination (before any RPC traffic)
//! 3. Connects to the node and resolves the start height
//! 4. Runs the feeder / worker / sink pipeline
//! 5. Reports a summary

use crate::commands::models::CollectArgs;
use crate::output::{open_destination, Destination, ResultSink};
use crate::pipeline::{resolve_start_height, run_pipeline, RunSummary, ShutdownSignal};
use crate::rpc::{ChainClient, RpcClient};
use crate::utils::config::MAX_CONCURRENCY;
use crate::utils::error::ConfigError;
use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::time::Instant;

/// Execute the run command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid arguments
/// * Output destination conflicts (checked before any RPC call)
/// * RPC client construction or chain head query failures
/// * The sink failing to write
///
/// Per-block and per-transaction failures are logged and counted in the
/// returned summary; they do not fail the run.
pub fn execute_collect(args: CollectArgs, shutdown: &ShutdownSignal) -> Result<RunSummary> {
    let start_time = Instant::now();

    validate_args(&args)?;

    let destination = Destination::from_output(args.output.clone(), args.overwrite);
    info!(
        "starting data collector to '{}' with concurrency = {}",
        destination.describe(),
        args.worker_count()
    );

    let writer = open_destination(&destination).context("Failed to open output destination")?;
    let mut sink = ResultSink::new(writer).with_label(destination.describe());

    info!("RPC endpoint: {}", args.rpc_url);
    let client = RpcClient::with_timeout(args.rpc_url.as_str(), args.timeout)
        .context("Failed to create RPC client")?;

    let summary = collect(&client, &args, &mut sink, shutdown)?;

    info!("Run summary: {}", summary.summary());

    if let Some(err) = &summary.sink.error {
        anyhow::bail!("Output stopped early: {}", err);
    }

    let mut writer = sink.into_inner();
    writer.flush().context("Failed to flush output")?;

    let elapsed = start_time.elapsed();
    info!("Collection completed in {:.2}s", elapsed.as_secs_f64());

    Ok(summary)
}

/// Resolve the start height and run the pipeline against any chain client
///
/// **Public** - lets callers supply their own client and sink
pub fn collect<C, W>(
    client: &C,
    args: &CollectArgs,
    sink: &mut ResultSink<W>,
    shutdown: &ShutdownSignal,
) -> Result<RunSummary>
where
    C: ChainClient + ?Sized,
    W: Write + Send,
{
    let start_height = resolve_start_height(client, args.start_block)
        .context("Failed to read current chain height")?;

    let config = args.pipeline_config(start_height);
    Ok(run_pipeline(client, &config, sink, shutdown))
}

/// Validate run arguments
///
/// **Public** - can be called before execute_collect for early validation
pub fn validate_args(args: &CollectArgs) -> Result<(), ConfigError> {
    if args.rpc_url.is_empty() {
        return Err(ConfigError::EmptyUrl);
    }

    if !args.rpc_url.starts_with("http://") && !args.rpc_url.starts_with("https://") {
        return Err(ConfigError::UnsupportedScheme);
    }

    if args.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::ConcurrencyTooLarge {
            max: MAX_CONCURRENCY,
            got: args.concurrency,
        });
    }

    if args.channel_capacity == 0 {
        return Err(ConfigError::ZeroChannelCapacity);
    }

    if args.timeout.is_zero() {
        return Err(ConfigError::ZeroTimeout);
    }

    Ok(())
}
