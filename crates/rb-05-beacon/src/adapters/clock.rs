//! Block clock driven by the caller.

use crate::ports::BlockClock;
use shared_types::{BlockContext, BlockNumber};
use std::sync::atomic::{AtomicU64, Ordering};

/// Nominal block interval used when advancing the clock.
pub const SECONDS_PER_BLOCK: u64 = 12;

/// Clock whose height only moves when told to.
#[derive(Debug, Default)]
pub struct ManualBlockClock {
    number: AtomicU64,
    timestamp: AtomicU64,
}

impl ManualBlockClock {
    pub fn new(number: BlockNumber, timestamp: u64) -> Self {
        Self {
            number: AtomicU64::new(number),
            timestamp: AtomicU64::new(timestamp),
        }
    }

    /// Jump to an explicit block.
    pub fn set(&self, number: BlockNumber, timestamp: u64) {
        self.number.store(number, Ordering::SeqCst);
        self.timestamp.store(timestamp, Ordering::SeqCst);
    }

    /// Mine `blocks` blocks.
    pub fn advance(&self, blocks: u64) -> BlockContext {
        let number = self.number.fetch_add(blocks, Ordering::SeqCst) + blocks;
        let timestamp = self
            .timestamp
            .fetch_add(blocks * SECONDS_PER_BLOCK, Ordering::SeqCst)
            + blocks * SECONDS_PER_BLOCK;
        BlockContext::new(number, timestamp)
    }

    /// Mine up to `number`. Never moves backwards.
    pub fn advance_to(&self, number: BlockNumber) -> BlockContext {
        let current = self.number.load(Ordering::SeqCst);
        self.advance(number.saturating_sub(current))
    }
}

impl BlockClock for ManualBlockClock {
    fn current(&self) -> BlockContext {
        BlockContext::new(
            self.number.load(Ordering::SeqCst),
            self.timestamp.load(Ordering::SeqCst),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let clock = ManualBlockClock::new(100, 1_000);
        let ctx = clock.advance(5);
        assert_eq!(ctx, BlockContext::new(105, 1_060));
        assert_eq!(clock.current(), ctx);
    }

    #[test]
    fn test_advance_to_never_rewinds() {
        let clock = ManualBlockClock::new(100, 0);
        assert_eq!(clock.advance_to(90).number, 100);
        assert_eq!(clock.advance_to(110).number, 110);
    }
}
