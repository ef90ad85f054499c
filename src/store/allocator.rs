use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out strictly increasing request identities.
///
/// Every call to [`IdAllocator::allocate`] advances the counter exactly once,
/// so concurrent callers always receive distinct values and, taken together,
/// a contiguous range starting at the initial value.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Allocate a fresh identity
    pub fn allocate(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The identity the next call to `allocate` will return
    pub fn peek_next(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
