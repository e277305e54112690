use crate::pipeline::PipelineConfig;
use crate::utils::config::{
    DEFAULT_CONCURRENCY, DEFAULT_RESULT_CHANNEL_CAPACITY, DEFAULT_RPC_TIMEOUT,
};
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the run command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CollectArgs {
    /// RPC endpoint URL
    pub rpc_url: String,

    /// First block to process (None = chain head)
    pub start_block: Option<u64>,

    /// Output file (None = stdout)
    pub output: Option<PathBuf>,

    /// Replace an existing output file
    pub overwrite: bool,

    /// Worker count (0 = default)
    pub concurrency: usize,

    /// Capacity of the worker -> sink channel
    pub channel_capacity: usize,

    /// Per-request RPC timeout
    pub timeout: Duration,
}

impl CollectArgs {
    /// Effective worker count (never 0)
    pub fn worker_count(&self) -> usize {
        self.pipeline_config(0).worker_count()
    }

    /// Pipeline configuration once the start height is known
    pub fn pipeline_config(&self, start_height: u64) -> PipelineConfig {
        PipelineConfig::new(start_height)
            .with_concurrency(self.concurrency)
            .with_result_capacity(self.channel_capacity)
    }
}

impl Default for CollectArgs {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            start_block: None,
            output: None,
            overwrite: false,
            concurrency: DEFAULT_CONCURRENCY,
            channel_capacity: DEFAULT_RESULT_CHANNEL_CAPACITY,
            timeout: DEFAULT_RPC_TIMEOUT,
        }
    }
}
