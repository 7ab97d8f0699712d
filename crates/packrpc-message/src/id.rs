use std::sync::atomic::{AtomicU32, Ordering};

/// Source of correlation ids for outgoing requests.
///
/// Implementations must never hand the same id to two callers while a
/// response could still arrive for it, no matter how many threads call in
/// concurrently.
pub trait IdGenerator: Send + Sync {
    /// Next unused id.
    fn next_id(&self) -> u32;
}

/// [`IdGenerator`] producing 1, 2, 3, ... from an atomic counter.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU32,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> u32 {
        // Wraps at u32::MAX; four billion outstanding correlations per
        // streamer is out of reach.
        self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }
}
