//! Bounded newest-first access log buffer

use std::collections::VecDeque;
use std::sync::Arc;

use accessflow_common::models::AccessEvent;
use tokio::sync::{RwLock, RwLockWriteGuard};

/// Default number of access events retained
pub const DEFAULT_CAPACITY: usize = 50;

/// Fixed-capacity log of access events, newest first
///
/// Inserting past capacity evicts the oldest entry. Iteration order always
/// matches reverse insertion order.
#[derive(Debug, Clone)]
pub struct AccessLogBuffer {
    entries: VecDeque<AccessEvent>,
    capacity: usize,
    next_sequence: u64,
}

impl AccessLogBuffer {
    /// Empty buffer; capacity is at least 1
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_sequence: 1,
        }
    }

    /// Buffer pre-loaded with historical entries given oldest first
    ///
    /// Freshly allocated ids continue after the seed count so they do not
    /// collide with seed ids of the form `l<n>`.
    pub fn seeded(capacity: usize, oldest_first: impl IntoIterator<Item = AccessEvent>) -> Self {
        let mut buffer = Self::with_capacity(capacity);
        let mut seeded = 0u64;
        for event in oldest_first {
            buffer.push(event);
            seeded += 1;
        }
        buffer.next_sequence = seeded + 1;
        buffer
    }

    /// Reserve the id for the next generated event
    pub fn allocate_id(&mut self) -> String {
        let id = format!("l{}", self.next_sequence);
        self.next_sequence += 1;
        id
    }

    /// Insert at the front, returning the evicted entry if over capacity
    pub fn push(&mut self, event: AccessEvent) -> Option<AccessEvent> {
        self.entries.push_front(event);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries newest first
    pub fn iter(&self) -> impl Iterator<Item = &AccessEvent> {
        self.entries.iter()
    }

    /// Copy of the whole buffer, newest first
    pub fn snapshot(&self) -> Vec<AccessEvent> {
        self.entries.iter().cloned().collect()
    }

    /// Copy of the newest `n` entries
    pub fn recent(&self, n: usize) -> Vec<AccessEvent> {
        self.entries.iter().take(n).cloned().collect()
    }
}

impl Default for AccessLogBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

/// Shared handle: one writer (the feed), many readers
#[derive(Debug, Clone)]
pub struct SharedLogBuffer {
    inner: Arc<RwLock<AccessLogBuffer>>,
}

impl SharedLogBuffer {
    pub fn new(buffer: AccessLogBuffer) -> Self {
        Self {
            inner: Arc::new(RwLock::new(buffer)),
        }
    }

    pub async fn snapshot(&self) -> Vec<AccessEvent> {
        self.inner.read().await.snapshot()
    }

    pub async fn recent(&self, n: usize) -> Vec<AccessEvent> {
        self.inner.read().await.recent(n)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Exclusive access for the feed
    pub async fn write(&self) -> RwLockWriteGuard<'_, AccessLogBuffer> {
        self.inner.write().await
    }
}
