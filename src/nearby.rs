//! Best-first nearest-neighbor traversal.
//!
//! The engine knows nothing about how a tree is stored. It asks a
//! [`SpatialTree`] for the children of one node at a time, scores them with a
//! [`BoxDistance`], and keeps everything it has seen but not yet expanded in a
//! [`NearbyQueue`]. Items are handed to the caller nearest first; internal
//! nodes are expanded as they reach the front of the queue.

use tracing::trace;

use crate::Rect;
use crate::distance::{BoxDistance, Distance};
use crate::queue::{NearbyQueue, QueueEntry};

/// Child entry reported by a [`SpatialTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Candidate<T, N> {
    /// A stored item
    Leaf {
        /// Bounding box of the item
        rect: Rect,
        /// The item
        item: T,
    },
    /// A subtree that has not been expanded yet
    Internal {
        /// Bounding box of everything in the subtree
        rect: Rect,
        /// Handle passed back to [`SpatialTree::children`] on expansion
        node: N,
    },
}

impl<T, N> Candidate<T, N> {
    /// Bounding box of the candidate.
    #[must_use]
    pub fn rect(&self) -> &Rect {
        match self {
            Self::Leaf { rect, .. } | Self::Internal { rect, .. } => rect,
        }
    }

    /// Whether this is a stored item.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

/// Hierarchical index that can enumerate the children of a node.
///
/// The enumeration must stay stable for the duration of one traversal. Since
/// traversal holds `&self`, a tree that only changes through `&mut self`
/// gets this for free.
pub trait SpatialTree {
    /// Stored item handed to the traversal callback
    type Item;
    /// Handle of an internal node
    type Node;

    /// Appends the children of `parent` to `out`, or of the root when
    /// `parent` is `None`.
    ///
    /// `out` is empty on entry. Leaves and internal nodes may be mixed and
    /// come in any order. Reporting nothing is fine, including for the root
    /// of an empty tree.
    fn children(
        &self,
        parent: Option<&Self::Node>,
        out: &mut Vec<Candidate<Self::Item, Self::Node>>,
    );

    /// Visits stored items from nearest to farthest. See [`nearby()`].
    fn nearby<F>(&self, metric: &BoxDistance<'_, Self::Item>, iter: F)
    where
        Self: Sized,
        F: FnMut(Rect, Self::Item, Distance) -> bool,
    {
        nearby(self, metric, iter);
    }
}

/// Visits the items of `tree` in non-decreasing distance from the metric's
/// query.
///
/// `iter` receives each item's rectangle, the item and its distance. Return
/// `false` to stop; nothing else is expanded or visited after that. An empty
/// tree produces no calls. Panics in `iter` or in the metric's item distance
/// propagate unchanged.
///
/// The order holds because internal nodes are scored with a lower bound on
/// anything they contain: the head of the queue is never farther than the
/// next unseen item. A custom item distance that undercuts its own box
/// distance is the caller's responsibility.
///
/// # Example
/// ```
/// use atlas_nearby::{BoxDistance, HilbertRTreeI32, Rect, nearby};
/// let mut tree = HilbertRTreeI32::new();
/// tree.add(10, 10, 12, 12);
/// tree.add(0, 0, 1, 1);
/// tree.add(5, 5, 6, 6);
/// tree.build();
///
/// let mut order = Vec::new();
/// nearby(&tree, &BoxDistance::new(Rect::point(0, 0)), |_, id, _| {
///     order.push(id);
///     true
/// });
/// assert_eq!(order, vec![1, 2, 0]);
/// ```
pub fn nearby<S, F>(tree: &S, metric: &BoxDistance<'_, S::Item>, mut iter: F)
where
    S: SpatialTree + ?Sized,
    F: FnMut(Rect, S::Item, Distance) -> bool,
{
    let mut queue = NearbyQueue::new();
    let mut children = Vec::new();
    let mut parent: Option<S::Node> = None;
    let mut expanded = 0_usize;
    let mut delivered = 0_usize;

    loop {
        tree.children(parent.as_ref(), &mut children);
        expanded += 1;
        for candidate in children.drain(..) {
            let dist = metric.score(&candidate);
            queue.push(QueueEntry { dist, candidate });
        }

        loop {
            let Some(QueueEntry { dist, candidate }) = queue.pop() else {
                trace!(expanded, delivered, cancelled = false, "nearby exhausted");
                return;
            };
            match candidate {
                Candidate::Leaf { rect, item } => {
                    delivered += 1;
                    if !iter(rect, item, dist) {
                        trace!(expanded, delivered, cancelled = true, "nearby stopped");
                        return;
                    }
                }
                Candidate::Internal { node, .. } => {
                    parent = Some(node);
                    break;
                }
            }
        }
    }
}
