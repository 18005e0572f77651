//! Bounded memory of already-handled messages.
//!
//! Slack redelivers events when an acknowledgement is slow, and several
//! handlers may be in flight at once. The cache remembers which
//! `(channel, ts)` pairs were already claimed so a pull request is never
//! approved twice for the same message. It is a growth guard rather than a
//! precise history: once the soft cap is exceeded the oldest batch of keys
//! is forgotten in one pass.

use std::collections::{HashSet, VecDeque};
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::models::event::InboundEvent;

/// Default soft cap on remembered keys.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default number of keys evicted once the cap is exceeded.
pub const DEFAULT_EVICT_BATCH: usize = 500;

/// Identity of one inbound message: channel plus message timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(String);

impl DedupKey {
    /// Build a key from a channel id and a message timestamp.
    #[must_use]
    pub fn new(channel_id: &str, ts: &str) -> Self {
        Self(format!("{channel_id}:{ts}"))
    }

    /// Key identifying `event`.
    #[must_use]
    pub fn for_event(event: &InboundEvent) -> Self {
        Self::new(&event.channel_id, &event.ts)
    }
}

impl Display for DedupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
struct Entries {
    members: HashSet<DedupKey>,
    order: VecDeque<DedupKey>,
}

/// Insertion-ordered set of seen message keys with batch eviction.
#[derive(Debug)]
pub struct DedupCache {
    capacity: usize,
    evict_batch: usize,
    entries: Mutex<Entries>,
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_EVICT_BATCH)
    }
}

impl DedupCache {
    /// Create a cache that evicts `evict_batch` oldest keys whenever it
    /// holds more than `capacity`.
    ///
    /// `capacity` is raised to at least 1 and `evict_batch` is clamped to
    /// `1..=capacity`.
    #[must_use]
    pub fn new(capacity: usize, evict_batch: usize) -> Self {
        let capacity = capacity.max(1);
        let clamped_batch = evict_batch.clamp(1, capacity);
        if clamped_batch != evict_batch {
            warn!(
                requested = evict_batch,
                effective = clamped_batch,
                capacity,
                "dedup evict batch clamped"
            );
        }
        Self {
            capacity,
            evict_batch: clamped_batch,
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Whether `key` is currently remembered.
    #[must_use]
    pub fn has_seen(&self, key: &DedupKey) -> bool {
        self.lock().members.contains(key)
    }

    /// Remember `key`. Re-marking a remembered key is a no-op.
    pub fn mark_seen(&self, key: DedupKey) {
        self.insert(key);
    }

    /// Atomically test and remember `key`.
    ///
    /// Returns `true` if the key was not yet remembered, i.e. the caller
    /// has claimed the message and should process it.
    #[must_use]
    pub fn check_and_mark(&self, key: DedupKey) -> bool {
        self.insert(key)
    }

    fn insert(&self, key: DedupKey) -> bool {
        let mut guard = self.lock();
        let entries = &mut *guard;
        if !entries.members.insert(key.clone()) {
            return false;
        }
        entries.order.push_back(key);

        if entries.order.len() > self.capacity {
            let batch = self.evict_batch.min(entries.order.len());
            for old in entries.order.drain(..batch) {
                entries.members.remove(&old);
            }
            debug!(
                evicted = batch,
                remaining = entries.order.len(),
                "dedup cache trimmed"
            );
        }
        true
    }

    /// Number of remembered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// Whether no keys are remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
