//! Configuration and constants for the collector.

use std::time::Duration;

/// Default timeout for RPC requests
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Worker count used when none (or zero) is configured
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Upper bound accepted for the worker count
pub const MAX_CONCURRENCY: usize = 256;

/// Capacity of the worker -> sink channel.
/// Producers block once this many records are waiting to be written.
pub const DEFAULT_RESULT_CHANNEL_CAPACITY: usize = 64;

/// Exit status used when a second interrupt forces the process down
pub const FORCED_EXIT_CODE: i32 = 130;

/// Struct-logger options for debug_traceTransaction.
/// Only the opcode name is consumed, so everything heavy is switched off.
pub const TRACE_DISABLE_STORAGE: bool = true;
pub const TRACE_DISABLE_STACK: bool = true;
pub const TRACE_ENABLE_MEMORY: bool = false;
pub const TRACE_ENABLE_RETURN_DATA: bool = false;
