//! Bounded, concurrency-safe store of captured requests
//!
//! The store keeps at most `capacity` records. Records are keyed by their
//! identity and an insertion-order queue drives FIFO eviction as well as
//! newest-first listing. Both structures live behind one reader/writer lock
//! so readers always see them in agreement.

mod allocator;
mod record;

pub use allocator::IdAllocator;
pub use record::{CapturedRequest, HeaderList, RequestRecord};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

static NEXT_STORE_TAG: AtomicU64 = AtomicU64::new(0);

// ============================================================
// Data Structures
// ============================================================

pub struct RequestStore {
    /// Distinguishes identities handed out by different stores
    tag: u64,
    capacity: NonZeroUsize,
    allocator: IdAllocator,
    inner: RwLock<StoreInner>,
}

/// State guarded by the store lock. `order.len() == by_id.len()` whenever
/// the lock is released.
struct StoreInner {
    by_id: HashMap<u64, Arc<RequestRecord>>,
    order: VecDeque<u64>,
    last_captured_at: Option<DateTime<Utc>>,
    total_inserted: u64,
    total_evicted: u64,
}

/// An identity handed out by [`RequestStore::allocate_id`]
///
/// Only the store can create one and [`RequestStore::insert`] consumes it,
/// so every identity is inserted at most once and only into its own store.
#[derive(Debug, PartialEq, Eq)]
pub struct AllocatedId {
    id: u64,
    store_tag: u64,
}

impl AllocatedId {
    pub fn get(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Request id {0} was allocated by a different store")]
    ForeignId(u64),
}

/// Result of capturing a request
#[derive(Debug, Clone)]
pub struct Captured {
    pub record: Arc<RequestRecord>,
    /// Identity pushed out to make room, if the store was full
    pub evicted: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub retained: usize,
    pub capacity: usize,
    pub total_captured: u64,
    pub total_evicted: u64,
    pub next_id: u64,
}

// ============================================================
// RequestStore Core Logic
// ============================================================

impl RequestStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            tag: NEXT_STORE_TAG.fetch_add(1, Ordering::Relaxed),
            capacity,
            allocator: IdAllocator::new(),
            inner: RwLock::new(StoreInner {
                by_id: HashMap::with_capacity(capacity.get()),
                order: VecDeque::with_capacity(capacity.get()),
                last_captured_at: None,
                total_inserted: 0,
                total_evicted: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Allocate an identity without inserting anything
    pub fn allocate_id(&self) -> AllocatedId {
        AllocatedId {
            id: self.allocator.allocate(),
            store_tag: self.tag,
        }
    }

    /// Assign an identity to `request` and insert it
    ///
    /// Allocation, timestamping and insertion happen under one exclusive
    /// lock, so identity order, timestamp order and insertion order agree
    /// even when many handlers capture at once.
    pub fn capture(&self, request: CapturedRequest) -> Captured {
        let mut inner = self.write();
        let id = self.allocator.allocate();
        inner.admit(self.capacity, id, request)
    }

    /// Insert `request` under an identity allocated earlier by this store
    ///
    /// Timestamping happens here, under the lock, like [`RequestStore::capture`].
    /// Under concurrency the insertion order may differ from identity order.
    pub fn insert(
        &self,
        id: AllocatedId,
        request: CapturedRequest,
    ) -> Result<Captured, StoreError> {
        if id.store_tag != self.tag {
            return Err(StoreError::ForeignId(id.id));
        }
        Ok(self.write().admit(self.capacity, id.id, request))
    }

    /// Every retained record, most recently inserted first
    ///
    /// The returned vector is owned by the caller; later inserts and
    /// evictions do not change it.
    pub fn list_newest_first(&self) -> Vec<Arc<RequestRecord>> {
        let inner = self.read();
        inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect()
    }

    /// Look up a retained record. `None` covers both "never captured" and
    /// "already evicted".
    pub fn get_by_id(&self, id: u64) -> Option<Arc<RequestRecord>> {
        self.read().by_id.get(&id).cloned()
    }

    /// The most recently inserted record still retained
    pub fn newest(&self) -> Option<Arc<RequestRecord>> {
        let inner = self.read();
        inner.order.back().and_then(|id| inner.by_id.get(id).cloned())
    }

    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.read();
        StoreStats {
            retained: inner.order.len(),
            capacity: self.capacity.get(),
            total_captured: inner.total_inserted,
            total_evicted: inner.total_evicted,
            next_id: self.allocator.peek_next(),
        }
    }

    // Nothing panics while the lock is held, so a poisoned lock still guards
    // consistent data.
    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StoreInner {
    /// Timestamp and append a record, evicting the oldest when over capacity.
    /// `id` must be fresh: callers only pass identities straight from the
    /// allocator.
    fn admit(&mut self, capacity: NonZeroUsize, id: u64, request: CapturedRequest) -> Captured {
        // Wall clock may step back; keep timestamps non-decreasing in insertion order.
        let now = Utc::now();
        let captured_at = match self.last_captured_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_captured_at = Some(captured_at);

        let record = Arc::new(RequestRecord::from_captured(id, request, captured_at));
        self.by_id.insert(id, record.clone());
        self.order.push_back(id);
        self.total_inserted += 1;

        let mut evicted = None;
        if self.order.len() > capacity.get() {
            if let Some(oldest) = self.order.pop_front() {
                self.by_id.remove(&oldest);
                self.total_evicted += 1;
                evicted = Some(oldest);
            }
        }

        Captured { record, evicted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn request(path: &str) -> CapturedRequest {
        CapturedRequest {
            method: "POST".to_string(),
            path: path.to_string(),
            query: None,
            protocol_version: "HTTP/1.1".to_string(),
            headers: HeaderList::new(),
            body: path.as_bytes().to_vec(),
            remote_address: "127.0.0.1:40000".to_string(),
        }
    }

    fn ids(records: &[Arc<RequestRecord>]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_store() {
        let store = RequestStore::new(capacity(100));
        assert!(store.is_empty());
        assert!(store.list_newest_first().is_empty());
        assert!(store.get_by_id(0).is_none());
        assert!(store.get_by_id(99).is_none());
        assert!(store.newest().is_none());
    }

    #[test]
    fn test_capture_assigns_sequential_ids() {
        let store = RequestStore::new(capacity(10));
        let a = store.capture(request("/a"));
        let b = store.capture(request("/b"));

        assert_eq!(a.record.id, 0);
        assert_eq!(b.record.id, 1);
        assert!(a.evicted.is_none());
        assert!(b.evicted.is_none());
        assert!(a.record.captured_at <= b.record.captured_at);
    }

    #[test]
    fn test_capacity_two_scenario() {
        let store = RequestStore::new(capacity(2));
        store.capture(request("/a"));
        store.capture(request("/b"));
        let c = store.capture(request("/c"));

        assert_eq!(c.evicted, Some(0));
        assert_eq!(ids(&store.list_newest_first()), vec![2, 1]);
        assert!(store.get_by_id(0).is_none());
        assert_eq!(store.get_by_id(1).unwrap().path, "/b");
        assert_eq!(store.get_by_id(2).unwrap().path, "/c");
    }

    #[test]
    fn test_capacity_one_keeps_only_latest() {
        let store = RequestStore::new(capacity(1));
        for i in 0..5 {
            store.capture(request(&format!("/{i}")));
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.newest().unwrap().id, 4);
        assert_eq!(ids(&store.list_newest_first()), vec![4]);
    }

    #[test]
    fn test_insert_with_allocated_ids() {
        let store = RequestStore::new(capacity(3));
        for path in ["/a", "/b", "/c", "/d"] {
            let id = store.allocate_id();
            store.insert(id, request(path)).unwrap();
        }

        assert_eq!(ids(&store.list_newest_first()), vec![3, 2, 1]);
        assert!(store.get_by_id(0).is_none());
    }

    #[test]
    fn test_insert_rejects_id_from_another_store() {
        let store = RequestStore::new(capacity(1));
        let other = RequestStore::new(capacity(1));
        store.capture(request("/a"));
        store.capture(request("/b"));

        // `other` hands out id 0, which `store` has already evicted
        let foreign = other.allocate_id();
        assert_eq!(foreign.get(), 0);
        let err = store.insert(foreign, request("/c")).unwrap_err();
        assert_eq!(err, StoreError::ForeignId(0));

        assert!(store.get_by_id(0).is_none());
        assert_eq!(ids(&store.list_newest_first()), vec![1]);
    }

    #[test]
    fn test_insert_timestamps_follow_insertion_order() {
        let store = RequestStore::new(capacity(4));
        let early = store.allocate_id();
        let late = store.allocate_id();

        let first_in = store.insert(late, request("/late")).unwrap().record;
        let second_in = store.insert(early, request("/early")).unwrap().record;

        assert_eq!(ids(&store.list_newest_first()), vec![0, 1]);
        assert!(first_in.captured_at <= second_in.captured_at);
    }

    #[test]
    fn test_stats_track_evictions() {
        let store = RequestStore::new(capacity(3));
        for i in 0..7 {
            store.capture(request(&format!("/{i}")));
        }

        let stats = store.stats();
        assert_eq!(
            stats,
            StoreStats {
                retained: 3,
                capacity: 3,
                total_captured: 7,
                total_evicted: 4,
                next_id: 7,
            }
        );
    }

    #[test]
    fn test_evicted_ids_are_never_reused() {
        let store = RequestStore::new(capacity(2));
        for _ in 0..4 {
            store.capture(request("/x"));
        }
        let next = store.capture(request("/y"));
        assert_eq!(next.record.id, 4);
    }
}
