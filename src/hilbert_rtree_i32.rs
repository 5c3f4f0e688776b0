//! Static Hilbert R-tree over `i32` rectangles.
//!
//! Items are added, then [`build`](HilbertRTreeI32::build) sorts them along a
//! Hilbert curve and packs parent levels bottom-up (the flatbush layout).
//! The tree serves as the [`SpatialTree`] behind [`nearby`](crate::nearby()):
//!
//! - `query_nearest_k` / `query_nearest` - nearest items to a rectangle,
//!   optionally wrapping axis 0 at the antimeridian
//! - `query_intersecting` - items overlapping or touching a rectangle
//! - `scan` - every item, no ordering

use tracing::debug;

use crate::distance::{BoxDistance, Distance};
use crate::error::{AtlasError, Result};
use crate::nearby::{Candidate, SpatialTree};
use crate::Rect;

const MAX_HILBERT: u32 = u16::MAX as u32;

/// Default number of children per node.
pub const DEFAULT_NODE_SIZE: usize = 16;

/// Hilbert R-tree for `i32` rectangles.
///
/// Node layout after build:
/// - `nodes[0..num_items)` - leaves in Hilbert order
/// - parents appended level by level, root last
///
/// For a leaf, `indices[pos]` is the item id (insertion order). For a
/// parent, it is the position of its first child.
#[derive(Clone, Debug)]
pub struct HilbertRTreeI32 {
    /// Item rectangles in insertion order
    items: Vec<Rect>,
    /// Leaf and parent boxes, filled by `build`
    nodes: Vec<Rect>,
    /// Item id for leaves, first child position for parents
    indices: Vec<usize>,
    /// End position of each tree level
    level_bounds: Vec<usize>,
    /// Children per node
    node_size: usize,
    /// Bounding box of all items
    bounds: Rect,
}

impl HilbertRTreeI32 {
    /// Creates a new empty tree with [`DEFAULT_NODE_SIZE`].
    ///
    /// # Example
    /// ```
    /// use atlas_nearby::HilbertRTreeI32;
    /// let tree = HilbertRTreeI32::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tree with room for `capacity` items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            nodes: Vec::new(),
            indices: Vec::new(),
            level_bounds: Vec::new(),
            node_size: DEFAULT_NODE_SIZE,
            bounds: Rect::EMPTY,
        }
    }

    /// Creates an empty tree with a custom fan-out.
    ///
    /// Small nodes make deeper trees with tighter boxes; large nodes make
    /// shallower trees that score more candidates per expansion.
    ///
    /// # Errors
    /// Returns [`AtlasError::InvalidNodeSize`] unless `2 <= node_size <= 65535`.
    ///
    /// # Example
    /// ```
    /// use atlas_nearby::HilbertRTreeI32;
    /// assert!(HilbertRTreeI32::with_node_size(4).is_ok());
    /// assert!(HilbertRTreeI32::with_node_size(1).is_err());
    /// ```
    pub fn with_node_size(node_size: usize) -> Result<Self> {
        if !(2..=usize::from(u16::MAX)).contains(&node_size) {
            return Err(AtlasError::InvalidNodeSize(node_size));
        }
        let mut tree = Self::new();
        tree.node_size = node_size;
        Ok(tree)
    }

    /// Adds a rectangle and returns its item id.
    ///
    /// Ids are assigned in insertion order starting at 0. Corners are not
    /// checked; see [`try_add`](Self::try_add). Adding to a built tree
    /// discards the build, so queries see nothing until `build()` runs again.
    ///
    /// # Example
    /// ```
    /// use atlas_nearby::HilbertRTreeI32;
    /// let mut tree = HilbertRTreeI32::new();
    /// assert_eq!(tree.add(0, 0, 10, 10), 0);
    /// assert_eq!(tree.add(5, 5, 15, 15), 1);
    /// tree.build();
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn add(&mut self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> usize {
        self.push(Rect::new([min_x, min_y], [max_x, max_y]))
    }

    /// Adds a rectangle after checking its corners.
    ///
    /// # Errors
    /// Returns [`AtlasError::InvalidRect`] when `min > max` on either axis;
    /// the tree is left unchanged.
    pub fn try_add(&mut self, rect: Rect) -> Result<usize> {
        let rect = Rect::try_new(rect.min, rect.max)?;
        Ok(self.push(rect))
    }

    fn push(&mut self, rect: Rect) -> usize {
        if self.is_built() {
            self.nodes.clear();
            self.indices.clear();
            self.level_bounds.clear();
        }
        self.bounds = self.bounds.union(&rect);
        self.items.push(rect);
        self.items.len() - 1
    }

    /// Builds the index. Must be called after the last `add` and before
    /// querying; calling it again without adding is a no-op.
    ///
    /// Building is O(n log n) for the Hilbert sort.
    pub fn build(&mut self) {
        let num_items = self.items.len();
        if num_items == 0 || self.is_built() {
            return;
        }
        let node_size = self.node_size;

        let mut level_bounds = Vec::with_capacity(16);
        let mut count = num_items;
        let mut total_nodes = num_items;
        level_bounds.push(total_nodes);
        loop {
            count = count.div_ceil(node_size);
            total_nodes += count;
            level_bounds.push(total_nodes);
            if count <= 1 {
                break;
            }
        }

        // Leaves in Hilbert order of their centres
        let mut order: Vec<(u32, usize)> = self
            .items
            .iter()
            .enumerate()
            .map(|(id, rect)| (self.hilbert_of(rect), id))
            .collect();
        order.sort_unstable_by_key(|&(h, _)| h);

        let mut nodes = Vec::with_capacity(total_nodes);
        let mut indices = Vec::with_capacity(total_nodes);
        for &(_, id) in &order {
            nodes.push(self.items[id]);
            indices.push(id);
        }

        // Pack parents, one level at a time
        let mut pos = 0;
        for &level_end in &level_bounds[..level_bounds.len() - 1] {
            while pos < level_end {
                let first = pos;
                let end = (pos + node_size).min(level_end);
                let node_box = nodes[first..end]
                    .iter()
                    .fold(Rect::EMPTY, |acc, child| acc.union(child));
                nodes.push(node_box);
                indices.push(first);
                pos = end;
            }
        }

        debug!(
            items = num_items,
            node_size,
            levels = level_bounds.len(),
            nodes = total_nodes,
            "built hilbert rtree"
        );

        self.nodes = nodes;
        self.indices = indices;
        self.level_bounds = level_bounds;
    }

    /// Number of items added.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the node levels are current.
    #[must_use]
    pub fn is_built(&self) -> bool {
        !self.level_bounds.is_empty()
    }

    /// Bounding box of all items, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        (!self.is_empty()).then_some(self.bounds)
    }

    /// Rectangle of item `id`.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<Rect> {
        self.items.get(id).copied()
    }

    /// Visits every item with its id, in insertion order, until `iter`
    /// returns `false`. Works on unbuilt trees too.
    ///
    /// # Example
    /// ```
    /// use atlas_nearby::HilbertRTreeI32;
    /// let mut tree = HilbertRTreeI32::new();
    /// tree.add(0, 0, 1, 1);
    /// tree.add(2, 2, 3, 3);
    /// let mut count = 0;
    /// tree.scan(|_, _| {
    ///     count += 1;
    ///     true
    /// });
    /// assert_eq!(count, 2);
    /// ```
    pub fn scan<F>(&self, mut iter: F)
    where
        F: FnMut(Rect, usize) -> bool,
    {
        for (id, rect) in self.items.iter().enumerate() {
            if !iter(*rect, id) {
                return;
            }
        }
    }

    /// Finds all items that intersect or touch `query`.
    ///
    /// # Arguments
    /// * `query` - Query rectangle
    /// * `results` - Output vector; cleared, then filled with item ids
    ///
    /// # Example
    /// ```
    /// use atlas_nearby::{HilbertRTreeI32, Rect};
    /// let mut tree = HilbertRTreeI32::new();
    /// tree.add(0, 0, 2, 2);
    /// tree.add(1, 1, 3, 3);
    /// tree.add(4, 4, 5, 5);
    /// tree.build();
    ///
    /// let mut results = Vec::new();
    /// tree.query_intersecting(Rect::new([0, 0], [2, 2]), &mut results);
    /// results.sort();
    /// assert_eq!(results, vec![0, 1]);
    /// ```
    pub fn query_intersecting(&self, query: Rect, results: &mut Vec<usize>) {
        results.clear();
        if !self.is_built() {
            return;
        }

        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            for pos in self.child_range(node) {
                if !query.intersects(&self.nodes[pos]) {
                    continue;
                }
                if pos < self.items.len() {
                    results.push(self.indices[pos]);
                } else {
                    stack.push(pos);
                }
            }
        }
    }

    /// Finds the `k` items nearest to `query`, nearest first.
    ///
    /// Distance is the squared box distance; items overlapping the query are
    /// at distance 0 and come out in no particular order among themselves.
    /// With `wrap_x`, axis 0 wraps at 360 (longitude).
    ///
    /// # Arguments
    /// * `query` - Query rectangle
    /// * `k` - Maximum number of results
    /// * `wrap_x` - Treat axis 0 as cylindrical
    /// * `results` - Output vector; cleared, then filled with item ids
    ///
    /// # Example
    /// ```
    /// use atlas_nearby::{HilbertRTreeI32, Rect};
    /// let mut tree = HilbertRTreeI32::new();
    /// tree.add(0, 0, 1, 1);
    /// tree.add(2, 2, 3, 3);
    /// tree.add(6, 6, 7, 7);
    /// tree.build();
    ///
    /// let mut results = Vec::new();
    /// tree.query_nearest_k(Rect::point(3, 4), 2, false, &mut results);
    /// assert_eq!(results, vec![1, 0]);
    /// ```
    pub fn query_nearest_k(&self, query: Rect, k: usize, wrap_x: bool, results: &mut Vec<usize>) {
        results.clear();
        if k == 0 {
            return;
        }
        self.nearby(&BoxDistance::new(query).wrap_x(wrap_x), |_, id, _| {
            results.push(id);
            results.len() < k
        });
    }

    /// Same as [`query_nearest_k`](Self::query_nearest_k), also reporting
    /// each item's squared distance.
    pub fn query_nearest_k_dist(
        &self,
        query: Rect,
        k: usize,
        wrap_x: bool,
        results: &mut Vec<(usize, Distance)>,
    ) {
        results.clear();
        if k == 0 {
            return;
        }
        self.nearby(&BoxDistance::new(query).wrap_x(wrap_x), |_, id, dist| {
            results.push((id, dist));
            results.len() < k
        });
    }

    /// Finds the single nearest item.
    ///
    /// # Example
    /// ```
    /// use atlas_nearby::{HilbertRTreeI32, Rect};
    /// let mut tree = HilbertRTreeI32::new();
    /// tree.add(175, 0, 178, 2);
    /// tree.add(-150, 0, -140, 2);
    /// tree.add(0, 0, 1, 1);
    /// tree.build();
    ///
    /// let query = Rect::point(-179, 1);
    /// assert_eq!(tree.query_nearest(query, false), Some(1));
    /// assert_eq!(tree.query_nearest(query, true), Some(0));
    /// ```
    #[must_use]
    pub fn query_nearest(&self, query: Rect, wrap_x: bool) -> Option<usize> {
        let mut nearest = None;
        self.nearby(&BoxDistance::new(query).wrap_x(wrap_x), |_, id, _| {
            nearest = Some(id);
            false
        });
        nearest
    }

    // --- Private helpers ---

    /// Position of the root node. Only valid on a built tree.
    #[inline]
    fn root(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Positions of the children of parent node `node`.
    #[inline]
    fn child_range(&self, node: usize) -> std::ops::Range<usize> {
        let first = self.indices[node];
        let end = (first + self.node_size).min(self.upper_bound(first));
        first..end
    }

    /// End of the level containing `pos`.
    #[inline]
    fn upper_bound(&self, pos: usize) -> usize {
        self.level_bounds
            .iter()
            .copied()
            .find(|&bound| bound > pos)
            .unwrap_or(self.nodes.len())
    }

    /// Hilbert index of the rectangle's centre within the tree bounds.
    fn hilbert_of(&self, rect: &Rect) -> u32 {
        let hx = hilbert_coord(rect.min[0], rect.max[0], self.bounds.min[0], self.bounds.max[0]);
        let hy = hilbert_coord(rect.min[1], rect.max[1], self.bounds.min[1], self.bounds.max[1]);
        hilbert_xy_to_index(hx, hy)
    }
}

impl Default for HilbertRTreeI32 {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialTree for HilbertRTreeI32 {
    type Item = usize;
    type Node = usize;

    fn children(&self, parent: Option<&usize>, out: &mut Vec<Candidate<usize, usize>>) {
        if !self.is_built() {
            return;
        }
        let node = parent.copied().unwrap_or_else(|| self.root());
        for pos in self.child_range(node) {
            let rect = self.nodes[pos];
            if pos < self.items.len() {
                out.push(Candidate::Leaf { rect, item: self.indices[pos] });
            } else {
                out.push(Candidate::Internal { rect, node: pos });
            }
        }
    }
}

/// Maps the doubled centre of `[min, max]` onto `0..MAX_HILBERT` within
/// `[lo, hi]`. Degenerate extents map to 0.
fn hilbert_coord(min: i32, max: i32, lo: i32, hi: i32) -> u32 {
    let extent = i64::from(hi) - i64::from(lo);
    if extent <= 0 {
        return 0;
    }
    let offset = i64::from(min) + i64::from(max) - 2 * i64::from(lo);
    let scaled = offset * i64::from(MAX_HILBERT - 1) / (2 * extent);
    u32::try_from(scaled.clamp(0, i64::from(MAX_HILBERT - 1))).unwrap_or(0)
}

/// Hilbert curve index computation
/// From <https://github.com/rawrunprotected/hilbert_curves> (public domain)
fn interleave(mut x: u32) -> u32 {
    x = (x | (x << 8)) & 0x00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333;
    x = (x | (x << 1)) & 0x5555_5555;
    x
}

#[expect(non_snake_case, reason = "names follow the reference algorithm")]
fn hilbert_xy_to_index(x: u32, y: u32) -> u32 {
    // Initial prefix scan round, prime with x and y
    let mut a = x ^ y;
    let mut b = 0xFFFF ^ a;
    let mut c = 0xFFFF ^ (x | y);
    let mut d = x & (y ^ 0xFFFF);
    let mut A = a | (b >> 1);
    let mut B = (a >> 1) ^ a;
    let mut C = ((c >> 1) ^ (b & (d >> 1))) ^ c;
    let mut D = ((a & (c >> 1)) ^ (d >> 1)) ^ d;

    a = A;
    b = B;
    c = C;
    d = D;
    A = (a & (a >> 2)) ^ (b & (b >> 2));
    B = (a & (b >> 2)) ^ (b & ((a ^ b) >> 2));
    C ^= (a & (c >> 2)) ^ (b & (d >> 2));
    D ^= (b & (c >> 2)) ^ ((a ^ b) & (d >> 2));

    a = A;
    b = B;
    c = C;
    d = D;
    A = (a & (a >> 4)) ^ (b & (b >> 4));
    B = (a & (b >> 4)) ^ (b & ((a ^ b) >> 4));
    C ^= (a & (c >> 4)) ^ (b & (d >> 4));
    D ^= (b & (c >> 4)) ^ ((a ^ b) & (d >> 4));

    // Final round and projection
    a = A;
    b = B;
    c = C;
    d = D;
    C ^= (a & (c >> 8)) ^ (b & (d >> 8));
    D ^= (b & (c >> 8)) ^ ((a ^ b) & (d >> 8));

    // Undo transformation prefix scan
    a = C ^ (C >> 1);
    b = D ^ (D >> 1);

    // Recover index bits
    let i0 = x ^ y;
    let i1 = b | (0xFFFF ^ (i0 | a));

    (interleave(i1) << 1) | interleave(i0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hilbert_coord_range() {
        assert_eq!(hilbert_coord(0, 0, 0, 100), 0);
        assert_eq!(hilbert_coord(100, 100, 0, 100), MAX_HILBERT - 1);
        assert_eq!(hilbert_coord(0, 100, 0, 100), (MAX_HILBERT - 1) / 2);
        assert_eq!(hilbert_coord(5, 5, 5, 5), 0);
        assert_eq!(hilbert_coord(i32::MAX, i32::MAX, i32::MIN, i32::MAX), MAX_HILBERT - 1);
    }

    #[test]
    fn test_hilbert_index_corners_are_distinct() {
        let m = MAX_HILBERT - 1;
        let corners = [
            hilbert_xy_to_index(0, 0),
            hilbert_xy_to_index(0, m),
            hilbert_xy_to_index(m, m),
            hilbert_xy_to_index(m, 0),
        ];
        assert_eq!(corners[0], 0);
        for i in 0..corners.len() {
            for j in i + 1..corners.len() {
                assert_ne!(corners[i], corners[j]);
            }
        }
    }

    #[test]
    fn test_level_bounds_single_node() {
        let mut tree = HilbertRTreeI32::new();
        for i in 0..10 {
            tree.add(i, i, i + 1, i + 1);
        }
        tree.build();
        assert_eq!(tree.level_bounds, vec![10, 11]);
        assert_eq!(tree.root(), 10);
        assert_eq!(tree.nodes[10], Rect::new([0, 0], [10, 10]));
    }

    #[test]
    fn test_level_bounds_multi_level() {
        let mut tree = HilbertRTreeI32::with_node_size(4).expect("valid node size");
        for i in 0..17 {
            tree.add(i, 0, i, 0);
        }
        tree.build();
        // 17 leaves -> 5 -> 2 -> 1
        assert_eq!(tree.level_bounds, vec![17, 22, 24, 25]);
        assert_eq!(tree.child_range(tree.root()), 22..24);
    }

    #[test]
    fn test_parent_boxes_cover_children() {
        let mut tree = HilbertRTreeI32::with_node_size(3).expect("valid node size");
        for i in 0..50 {
            tree.add(i * 7 % 31, i * 3 % 17, i * 7 % 31 + 2, i * 3 % 17 + 1);
        }
        tree.build();
        for node in tree.items.len()..tree.nodes.len() {
            for pos in tree.child_range(node) {
                assert!(tree.nodes[node].contains(&tree.nodes[pos]), "node {node} child {pos}");
            }
        }
    }

    #[test]
    fn test_leaves_hold_every_id_once() {
        let mut tree = HilbertRTreeI32::new();
        for i in 0..100 {
            tree.add(i % 10, i / 10, i % 10, i / 10);
        }
        tree.build();
        let mut ids = tree.indices[..100].to_vec();
        ids.sort_unstable();
        assert_eq!(ids, (0..100).collect::<Vec<_>>());
    }
}
