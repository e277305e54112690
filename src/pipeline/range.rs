//! Block range enumeration and the feeder that hands heights to workers.

use super::shutdown::ShutdownSignal;
use crate::rpc::ChainClient;
use crate::utils::error::RpcError;
use log::{debug, info, warn};
use crossbeam_channel::Sender;

/// Descending, gap-free walk from `start` down to block 1.
///
/// Block 0 is never produced; a start of 0 is an empty range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRange {
    next: u64,
}

impl BlockRange {
    pub fn new(start: u64) -> Self {
        Self { next: start }
    }

    /// Heights not yet produced
    pub fn remaining(&self) -> u64 {
        self.next
    }
}

impl Iterator for BlockRange {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next == 0 {
            return None;
        }
        let number = self.next;
        self.next -= 1;
        Some(number)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.next) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Pick the first height to walk
///
/// The head is always queried, which doubles as the startup connectivity
/// check. An explicit start wins over the head; the head is a snapshot and
/// later blocks are not revisited.
pub fn resolve_start_height<C: ChainClient + ?Sized>(
    client: &C,
    explicit: Option<u64>,
) -> Result<u64, RpcError> {
    let head = client.current_height()?;
    debug!("Chain head is at block {}", head);

    match explicit {
        Some(start) => {
            if start > head {
                warn!(
                    "start block {} is above the chain head {}; missing blocks will fail",
                    start, head
                );
            }
            Ok(start)
        }
        None => Ok(head),
    }
}

/// Push every height of `range` into the block queue.
///
/// Returns the number of heights handed out. Dropping `queue` on return is
/// what tells workers the range is exhausted.
pub fn feed_blocks(range: BlockRange, queue: Sender<u64>, shutdown: &ShutdownSignal) -> u64 {
    let mut dispatched = 0;

    for number in range {
        if shutdown.is_triggered() {
            info!("Shutdown requested, no longer dispatching from block {}", number);
            break;
        }
        if queue.send(number).is_err() {
            // every worker is gone
            break;
        }
        dispatched += 1;
    }

    debug!("Block feed finished after {} blocks", dispatched);
    dispatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn test_range_descends_to_one() {
        let blocks: Vec<u64> = BlockRange::new(5).collect();
        assert_eq!(blocks, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_range_zero_is_empty() {
        assert_eq!(BlockRange::new(0).next(), None);
    }

    #[test]
    fn test_remaining() {
        let mut range = BlockRange::new(3);
        range.next();
        assert_eq!(range.remaining(), 2);
        assert_eq!(range.size_hint(), (2, Some(2)));
    }

    #[test]
    fn test_feed_blocks_closes_queue() {
        let (tx, rx) = bounded(16);
        let shutdown = ShutdownSignal::new();

        let dispatched = feed_blocks(BlockRange::new(4), tx, &shutdown);
        let received: Vec<u64> = rx.iter().collect();

        assert_eq!(dispatched, 4);
        assert_eq!(received, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_feed_blocks_respects_shutdown() {
        let (tx, rx) = bounded(16);
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let dispatched = feed_blocks(BlockRange::new(10), tx, &shutdown);

        assert_eq!(dispatched, 0);
        assert_eq!(rx.iter().count(), 0);
    }

    #[test]
    fn test_feed_blocks_stops_when_workers_are_gone() {
        let (tx, rx) = bounded(1);
        drop(rx);

        let dispatched = feed_blocks(BlockRange::new(10), tx, &ShutdownSignal::new());

        assert_eq!(dispatched, 0);
    }
}
