//! Bounded, insertion-ordered membership set with FIFO eviction.

use crate::domain::{AssetUnit, TxId};
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Number of recently seen transaction ids kept for deduplication.
pub const DEDUP_WINDOW_CAPACITY: usize = 250;

/// Number of recently purchased assets kept to prevent re-buying.
pub const PURCHASE_LEDGER_CAPACITY: usize = 10;

/// Recently seen transaction ids.
pub type DedupWindow = BoundedOrderedSet<TxId>;

/// Recently purchased assets.
pub type PurchaseLedger = BoundedOrderedSet<AssetUnit>;

/// A membership set that remembers at most `capacity` keys.
///
/// Keys are evicted oldest-first. Recording a key that is already present is
/// a no-op and does not refresh its position.
#[derive(Debug, Clone)]
pub struct BoundedOrderedSet<K> {
    capacity: usize,
    order: VecDeque<K>,
    members: HashSet<K>,
}

impl<K> BoundedOrderedSet<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity.saturating_add(1)),
            members: HashSet::with_capacity(capacity.saturating_add(1)),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.members.contains(key)
    }

    /// Record a key, evicting the oldest entries beyond capacity.
    ///
    /// Returns `true` if the key was newly recorded.
    pub fn record(&mut self, key: K) -> bool {
        if self.members.contains(&key) {
            return false;
        }
        self.members.insert(key.clone());
        self.order.push_back(key);
        self.evict_overflow();
        true
    }

    fn evict_overflow(&mut self) {
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}

impl DedupWindow {
    pub fn with_default_capacity() -> Self {
        Self::new(DEDUP_WINDOW_CAPACITY)
    }
}

impl PurchaseLedger {
    pub fn with_default_capacity() -> Self {
        Self::new(PURCHASE_LEDGER_CAPACITY)
    }
}
