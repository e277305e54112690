//! The collection pipeline.
//!
//! ```text
//! feeder --(block queue)--> worker x N --(result channel)--> sink
//! ```
//!
//! - One feeder thread walks the block range and closes the queue when done
//! - N workers share the queue and the chain client
//! - One sink owns the destination and writes records one line at a time
//!
//! Both channels are bounded, so a slow sink pushes back on the workers and
//! busy workers push back on the feeder.

pub mod range;
pub mod shutdown;
pub mod worker;

pub use range::{feed_blocks, resolve_start_height, BlockRange};
pub use shutdown::{ShutdownSignal, SignalAction};
pub use worker::{process_block, run_worker, trace_transaction, BlockFlow, TxOutcome, WorkerStats};

use crate::output::{ResultRecord, ResultSink, SinkStats};
use crate::rpc::ChainClient;
use crate::utils::config::{DEFAULT_CONCURRENCY, DEFAULT_RESULT_CHANNEL_CAPACITY};
use log::{error, info};
use std::io::Write;
use std::sync::mpsc;
use std::thread;

/// Everything the pipeline needs to know about a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// First (highest) block to process
    pub start_height: u64,

    /// Requested worker count; 0 means the default
    pub concurrency: usize,

    /// Capacity of the worker -> sink channel
    pub result_capacity: usize,
}

impl PipelineConfig {
    pub fn new(start_height: u64) -> Self {
        Self {
            start_height,
            concurrency: DEFAULT_CONCURRENCY,
            result_capacity: DEFAULT_RESULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_result_capacity(mut self, capacity: usize) -> Self {
        self.result_capacity = capacity;
        self
    }

    /// Effective worker count (never 0)
    pub fn worker_count(&self) -> usize {
        if self.concurrency == 0 {
            DEFAULT_CONCURRENCY
        } else {
            self.concurrency
        }
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Heights handed to workers
    pub blocks_dispatched: u64,

    /// Totals across all workers
    pub workers: WorkerStats,

    /// What the sink managed to write
    pub sink: SinkStats,

    /// Whether the run ended before the range was exhausted
    pub stopped_early: bool,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} blocks dispatched ({} processed, {} failed, {} cut short, {} discarded), \
             {} transactions seen, {} records written, {} contract creations, \
             {} missing traces, {} failed traces, {} records dropped",
            self.blocks_dispatched,
            self.workers.blocks_processed,
            self.workers.blocks_failed,
            self.workers.blocks_partial,
            self.workers.blocks_discarded,
            self.workers.transactions_seen,
            self.sink.written,
            self.workers.contract_creations,
            self.workers.missing_traces,
            self.workers.failed_traces,
            self.sink.dropped,
        )
    }
}

/// Run the feeder, the worker pool and the sink to completion.
///
/// **Public** - pipeline entry point
///
/// Returns once the range is exhausted (or shutdown was requested), every
/// worker has exited and the sink has written everything it received.
pub fn run_pipeline<C, W>(
    client: &C,
    config: &PipelineConfig,
    sink: &mut ResultSink<W>,
    shutdown: &ShutdownSignal,
) -> RunSummary
where
    C: ChainClient + ?Sized,
    W: Write + Send,
{
    let workers = config.worker_count();
    let range = BlockRange::new(config.start_height);

    info!(
        "Processing {} blocks from {} down to 1 with {} workers",
        range.remaining(),
        config.start_height,
        workers
    );

    let (block_tx, block_rx) = crossbeam_channel::bounded::<u64>(workers);
    let (record_tx, record_rx) =
        mpsc::sync_channel::<ResultRecord>(config.result_capacity.max(1));

    thread::scope(|scope| {
        let sink_handle = scope.spawn(move || sink.run(record_rx));
        let feeder_handle = scope.spawn(move || feed_blocks(range, block_tx, shutdown));

        let worker_handles: Vec<_> = (0..workers)
            .map(|id| {
                let queue = block_rx.clone();
                let results = record_tx.clone();
                scope.spawn(move || run_worker(id, client, queue, results, shutdown))
            })
            .collect();

        // Workers own the only receivers and senders from here on; the
        // feeder sees a disconnect if they all exit, the sink finishes once
        // the last worker drops its sender
        drop(block_rx);
        drop(record_tx);

        let mut summary = RunSummary::default();

        for (id, handle) in worker_handles.into_iter().enumerate() {
            match handle.join() {
                Ok(stats) => summary.workers.merge(&stats),
                Err(_) => error!("worker {} panicked", id),
            }
        }

        match feeder_handle.join() {
            Ok(dispatched) => summary.blocks_dispatched = dispatched,
            Err(_) => error!("block feeder panicked"),
        }

        match sink_handle.join() {
            Ok(stats) => summary.sink = stats,
            Err(_) => {
                error!("result sink panicked");
                summary.sink.error = Some("result sink panicked".to_string());
            }
        }

        summary.stopped_early = shutdown.is_triggered();
        summary
    })
}
