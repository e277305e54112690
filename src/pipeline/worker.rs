//! Trace workers: one block in, zero or more records out.

use super::shutdown::ShutdownSignal;
use crate::aggregator::{build_opcode_histogram, total_steps};
use crate::output::ResultRecord;
use crate::rpc::{ChainClient, Transaction};
use crate::utils::error::RpcError;
use log::{debug, error, info, warn};
use crossbeam_channel::Receiver;
use std::sync::mpsc::SyncSender;

/// Result of handling a single transaction
#[derive(Debug)]
pub enum TxOutcome {
    /// Traced and reduced
    Record(ResultRecord),
    /// No recipient, nothing to attribute the trace to
    ContractCreation,
    /// The node returned no trace
    NoTrace,
    /// The trace request failed
    TraceFailed(RpcError),
}

/// Whether a worker can keep emitting after a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFlow {
    Continue,
    SinkClosed,
}

/// Per-worker counters, merged into the run summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub blocks_processed: u64,
    pub blocks_failed: u64,
    /// Cut short because the sink went away; some of their records were sent
    pub blocks_partial: u64,
    /// Pulled from the queue after shutdown and left untouched
    pub blocks_discarded: u64,
    pub transactions_seen: u64,
    pub records_emitted: u64,
    pub contract_creations: u64,
    pub missing_traces: u64,
    pub failed_traces: u64,
}

impl WorkerStats {
    pub fn merge(&mut self, other: &WorkerStats) {
        self.blocks_processed += other.blocks_processed;
        self.blocks_failed += other.blocks_failed;
        self.blocks_partial += other.blocks_partial;
        self.blocks_discarded += other.blocks_discarded;
        self.transactions_seen += other.transactions_seen;
        self.records_emitted += other.records_emitted;
        self.contract_creations += other.contract_creations;
        self.missing_traces += other.missing_traces;
        self.failed_traces += other.failed_traces;
    }
}

/// Trace one transaction and reduce it to a record
pub fn trace_transaction<C: ChainClient + ?Sized>(
    client: &C,
    block: u64,
    tx_index: usize,
    tx: &Transaction,
) -> TxOutcome {
    let Some(contract) = tx.to.as_ref() else {
        return TxOutcome::ContractCreation;
    };

    match client.transaction_trace(&tx.hash) {
        Ok(Some(trace)) => {
            if trace.failed {
                debug!("{} in block {} reverted, counting its steps anyway", tx.hash, block);
            }
            TxOutcome::Record(ResultRecord {
                block,
                tx_index,
                hash: tx.hash.clone(),
                contract: contract.clone(),
                opcodes: build_opcode_histogram(&trace),
            })
        }
        Ok(None) => TxOutcome::NoTrace,
        Err(e) => TxOutcome::TraceFailed(e),
    }
}

/// Fetch a block and emit a record for each traceable transaction, in
/// block order.
///
/// `emit` returns `false` once the sink has gone away; processing of the
/// block stops there.
///
/// # Errors
/// Only a failed block fetch. Per-transaction failures are counted in
/// `stats` and skipped.
pub fn process_block<C, F>(
    client: &C,
    number: u64,
    stats: &mut WorkerStats,
    mut emit: F,
) -> Result<BlockFlow, RpcError>
where
    C: ChainClient + ?Sized,
    F: FnMut(ResultRecord) -> bool,
{
    let block = client.block_with_transactions(number)?;

    debug!(
        "block {} has {} transactions",
        number,
        block.transactions.len()
    );

    for (tx_index, tx) in block.transactions.iter().enumerate() {
        stats.transactions_seen += 1;

        match trace_transaction(client, number, tx_index, tx) {
            TxOutcome::Record(record) => {
                debug!(
                    "traced {} in block {}: {} steps",
                    tx.hash,
                    number,
                    total_steps(&record.opcodes)
                );
                if !emit(record) {
                    return Ok(BlockFlow::SinkClosed);
                }
                stats.records_emitted += 1;
            }
            TxOutcome::ContractCreation => {
                debug!("skipping contract creation {} in block {}", tx.hash, number);
                stats.contract_creations += 1;
            }
            TxOutcome::NoTrace => {
                warn!("no trace for {} in block {}", tx.hash, number);
                stats.missing_traces += 1;
            }
            TxOutcome::TraceFailed(e) => {
                error!("failed to trace {} in block {}: {}", tx.hash, number, e);
                stats.failed_traces += 1;
            }
        }
    }

    Ok(BlockFlow::Continue)
}

/// Worker loop: pull heights until the queue is closed and empty.
///
/// Every worker holds its own clone of the queue receiver and competes for
/// heights. After shutdown is requested, remaining heights are pulled and
/// discarded so the feeder is never left blocked on a full queue.
pub fn run_worker<C: ChainClient + ?Sized>(
    id: usize,
    client: &C,
    queue: Receiver<u64>,
    results: SyncSender<ResultRecord>,
    shutdown: &ShutdownSignal,
) -> WorkerStats {
    let mut stats = WorkerStats::default();
    debug!("worker {} started", id);

    for number in queue.iter() {
        if shutdown.is_triggered() {
            debug!("worker {} discarding block {}", id, number);
            stats.blocks_discarded += 1;
            continue;
        }

        info!("block: {}", number);

        match process_block(client, number, &mut stats, |record| {
            results.send(record).is_ok()
        }) {
            Ok(BlockFlow::Continue) => stats.blocks_processed += 1,
            Ok(BlockFlow::SinkClosed) => {
                error!(
                    "worker {}: result sink closed during block {}, requesting shutdown",
                    id, number
                );
                stats.blocks_partial += 1;
                shutdown.trigger();
            }
            Err(e) => {
                error!("worker {}: failed to fetch block {}: {}", id, number, e);
                stats.blocks_failed += 1;
            }
        }
    }

    debug!("worker {} finished: {:?}", id, stats);
    stats
}
