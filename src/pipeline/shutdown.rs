//! Process-level shutdown requests.

use crate::utils::config::FORCED_EXIT_CODE;
use log::warn;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// What to do after a termination signal arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// First signal: stop taking new work and let the pipeline wind down
    Drain,
    /// Any later signal: leave now
    ForceExit,
}

/// Shared stop flag, cloned into every thread that needs to observe it
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
    signals: Arc<AtomicUsize>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the pipeline to stop dispatching work
    pub fn trigger(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Record an incoming termination signal
    pub fn register_signal(&self) -> SignalAction {
        let seen = self.signals.fetch_add(1, Ordering::SeqCst);
        self.trigger();
        if seen == 0 {
            SignalAction::Drain
        } else {
            SignalAction::ForceExit
        }
    }

    /// Route SIGINT/SIGTERM/SIGHUP to this signal.
    ///
    /// Can only be installed once per process.
    pub fn install_handler(&self) -> Result<(), ctrlc::Error> {
        let signal = self.clone();
        ctrlc::set_handler(move || match signal.register_signal() {
            SignalAction::Drain => {
                warn!("Interrupt received, finishing in-flight blocks (interrupt again to exit now)");
            }
            SignalAction::ForceExit => {
                warn!("Second interrupt received, exiting");
                std::process::exit(FORCED_EXIT_CODE);
            }
        })
    }
}
