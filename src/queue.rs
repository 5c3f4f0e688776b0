//! Min-priority queue of traversal candidates ordered by distance.
//!
//! One queue lives inside a single [`nearby`](crate::nearby()) call and is
//! dropped when the call returns.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::distance::Distance;

/// Queued value with its distance key.
#[derive(Clone, Debug)]
pub struct QueueEntry<C> {
    /// Sort key
    pub dist: Distance,
    /// Payload, opaque to the queue
    pub candidate: C,
}

impl<C> PartialEq for QueueEntry<C> {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist
    }
}

impl<C> Eq for QueueEntry<C> {}

impl<C> PartialOrd for QueueEntry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C> Ord for QueueEntry<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the smallest distance is on top
        other.dist.cmp(&self.dist)
    }
}

/// Binary min-heap keyed by distance.
///
/// Entries are opaque once pushed: no decrease-key, no removal other than
/// [`pop`](NearbyQueue::pop), no duplicate detection. Equal distances come
/// out in no particular order.
///
/// # Example
/// ```
/// use atlas_nearby::queue::{NearbyQueue, QueueEntry};
/// let mut q = NearbyQueue::new();
/// q.push(QueueEntry { dist: 9, candidate: 'a' });
/// q.push(QueueEntry { dist: 1, candidate: 'b' });
/// assert_eq!(q.pop().map(|e| e.candidate), Some('b'));
/// assert_eq!(q.pop().map(|e| e.candidate), Some('a'));
/// assert!(q.pop().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct NearbyQueue<C> {
    heap: BinaryHeap<QueueEntry<C>>,
}

impl<C> NearbyQueue<C> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new() }
    }

    /// Creates an empty queue with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { heap: BinaryHeap::with_capacity(capacity) }
    }

    /// Inserts an entry. O(log n).
    #[inline]
    pub fn push(&mut self, entry: QueueEntry<C>) {
        self.heap.push(entry);
    }

    /// Removes the entry with the smallest distance, or `None` when empty.
    /// O(log n).
    #[inline]
    pub fn pop(&mut self) -> Option<QueueEntry<C>> {
        self.heap.pop()
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<C> Default for NearbyQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}
