//! Box-distance scoring for best-first traversal.
//!
//! Distances are squared Euclidean gaps between rectangles. For internal
//! tree nodes the value is a lower bound on the distance to anything stored
//! beneath them, which is what keeps [`nearby`](crate::nearby()) results in
//! order.

use std::fmt;

use crate::Rect;
use crate::nearby::Candidate;

/// Squared distance between rectangles.
pub type Distance = u64;

/// Period of the cylindrical axis 0 (degrees of longitude).
pub const WRAP_PERIOD: i64 = 360;

/// Exact distance for a stored item, replacing the box distance for leaves.
pub type ItemDistanceFn<'a, T> = Box<dyn Fn(&Rect, &T) -> Distance + 'a>;

/// Raw gap between two ranges on one axis; positive only when disjoint.
#[inline(always)]
fn axis_gap(a_min: i64, a_max: i64, b_min: i64, b_max: i64) -> i64 {
    a_min.max(b_min) - a_max.min(b_max)
}

#[inline(always)]
fn squared(gap: i64) -> Distance {
    if gap > 0 {
        let gap = gap.unsigned_abs();
        gap.saturating_mul(gap)
    } else {
        0
    }
}

/// Squared box distance from `query` to `rect`.
///
/// Each axis contributes the square of the gap between the two ranges, or
/// zero when they overlap or touch. With `wrap_x`, axis 0 is treated as a
/// cylinder of period [`WRAP_PERIOD`]: the candidate is also tried shifted by
/// -360 and +360 and the smallest gap wins, so boxes on either side of the
/// antimeridian come out close.
///
/// # Example
/// ```
/// use atlas_nearby::{Rect, box_dist};
/// let a = Rect::point(170, 33);
/// let b = Rect::point(-170, 33);
/// assert_eq!(box_dist(&a, &b, false), 340 * 340);
/// assert_eq!(box_dist(&a, &b, true), 20 * 20);
/// ```
#[must_use]
pub fn box_dist(query: &Rect, rect: &Rect, wrap_x: bool) -> Distance {
    let q_min_x = i64::from(query.min[0]);
    let q_max_x = i64::from(query.max[0]);
    let r_min_x = i64::from(rect.min[0]);
    let r_max_x = i64::from(rect.max[0]);

    let mut gap_x = axis_gap(q_min_x, q_max_x, r_min_x, r_max_x);
    if wrap_x {
        let left = axis_gap(q_min_x, q_max_x, r_min_x - WRAP_PERIOD, r_max_x - WRAP_PERIOD);
        let right = axis_gap(q_min_x, q_max_x, r_min_x + WRAP_PERIOD, r_max_x + WRAP_PERIOD);
        gap_x = gap_x.min(left.min(right));
    }

    let gap_y = axis_gap(
        i64::from(query.min[1]),
        i64::from(query.max[1]),
        i64::from(rect.min[1]),
        i64::from(rect.max[1]),
    );

    squared(gap_x).saturating_add(squared(gap_y))
}

/// Distance metric centred on a query rectangle.
///
/// Internal nodes are always scored with [`box_dist`]. Leaves use the same
/// formula unless an item distance is installed with
/// [`BoxDistance::item_distance`]; ordering of leaves is then only as good as
/// that function.
///
/// # Example
/// ```
/// use atlas_nearby::{BoxDistance, Rect};
/// let metric = BoxDistance::<usize>::new(Rect::point(0, 0)).wrap_x(true);
/// assert!(metric.is_wrapped());
/// assert_eq!(metric.node_bound(&Rect::new([3, 4], [5, 5])), 25);
/// ```
pub struct BoxDistance<'a, T> {
    query: Rect,
    wrap_x: bool,
    item_dist: Option<ItemDistanceFn<'a, T>>,
}

impl<'a, T> BoxDistance<'a, T> {
    /// Creates an unwrapped metric without an item override.
    #[must_use]
    pub fn new(query: Rect) -> Self {
        Self { query, wrap_x: false, item_dist: None }
    }

    /// Enables or disables antimeridian wrapping on axis 0.
    #[must_use]
    pub fn wrap_x(mut self, wrap_x: bool) -> Self {
        self.wrap_x = wrap_x;
        self
    }

    /// Installs an exact distance for leaf items.
    ///
    /// The function sees the item's rectangle and the item itself. It is
    /// never consulted for internal nodes.
    #[must_use]
    pub fn item_distance<F>(mut self, f: F) -> Self
    where
        F: Fn(&Rect, &T) -> Distance + 'a,
    {
        self.item_dist = Some(Box::new(f));
        self
    }

    /// The query rectangle.
    #[must_use]
    pub fn query(&self) -> Rect {
        self.query
    }

    /// Whether axis 0 wraps.
    #[must_use]
    pub fn is_wrapped(&self) -> bool {
        self.wrap_x
    }

    /// Admissible lower bound for anything inside `rect`.
    #[inline]
    #[must_use]
    pub fn node_bound(&self, rect: &Rect) -> Distance {
        box_dist(&self.query, rect, self.wrap_x)
    }

    /// Distance of a stored item.
    #[inline]
    #[must_use]
    pub fn item(&self, rect: &Rect, item: &T) -> Distance {
        match &self.item_dist {
            Some(f) => f(rect, item),
            None => box_dist(&self.query, rect, self.wrap_x),
        }
    }

    /// Scores a traversal candidate.
    #[inline]
    pub fn score<N>(&self, candidate: &Candidate<T, N>) -> Distance {
        match candidate {
            Candidate::Leaf { rect, item } => self.item(rect, item),
            Candidate::Internal { rect, .. } => self.node_bound(rect),
        }
    }
}

impl<T> fmt::Debug for BoxDistance<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxDistance")
            .field("query", &self.query)
            .field("wrap_x", &self.wrap_x)
            .field("item_dist", &self.item_dist.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn rect(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Rect {
        Rect::new([min_x, min_y], [max_x, max_y])
    }

    #[test]
    fn test_box_dist_zero_when_overlapping_or_touching() {
        let a = rect(0, 0, 10, 10);
        assert_eq!(box_dist(&a, &rect(5, 5, 15, 15), false), 0);
        assert_eq!(box_dist(&a, &rect(10, 10, 20, 20), false), 0);
        assert_eq!(box_dist(&a, &rect(10, -4, 12, 0), false), 0);
        assert_eq!(box_dist(&a, &rect(2, 2, 3, 3), false), 0);
    }

    #[test]
    fn test_box_dist_sums_squared_gaps() {
        let a = rect(0, 0, 10, 10);
        // gap 3 on x only
        assert_eq!(box_dist(&a, &rect(13, 0, 20, 10), false), 9);
        // gap 3 on x, 4 on y
        assert_eq!(box_dist(&a, &rect(13, 14, 20, 20), false), 25);
        // symmetric
        assert_eq!(box_dist(&rect(13, 14, 20, 20), &a, false), 25);
    }

    #[test]
    fn test_box_dist_points() {
        let a = Rect::point(1, 1);
        assert_eq!(box_dist(&a, &Rect::point(1, 1), false), 0);
        assert_eq!(box_dist(&a, &Rect::point(4, 5), false), 25);
    }

    #[test]
    fn test_zero_distance_iff_intersecting() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let ax = rng.random_range(-50..50);
            let ay = rng.random_range(-50..50);
            let bx = rng.random_range(-50..50);
            let by = rng.random_range(-50..50);
            let a = rect(ax, ay, ax + rng.random_range(0..10), ay + rng.random_range(0..10));
            let b = rect(bx, by, bx + rng.random_range(0..10), by + rng.random_range(0..10));
            let dist = box_dist(&a, &b, false);
            assert_eq!(dist == 0, a.intersects(&b), "a={a:?} b={b:?} dist={dist}");
        }
    }

    #[test]
    fn test_antimeridian_points() {
        let a = Rect::point(170, 33);
        let b = Rect::point(-170, 33);
        let unwrapped = box_dist(&a, &b, false);
        let wrapped = box_dist(&a, &b, true);
        assert_eq!(unwrapped, 340 * 340);
        // same as moving `a` one period to the west
        assert_eq!(wrapped, box_dist(&Rect::point(-190, 33), &b, false));
        assert_eq!(wrapped, 400);
        assert!(wrapped < unwrapped);
    }

    #[test]
    fn test_wrapped_never_exceeds_unwrapped() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let ax = rng.random_range(-180..180);
            let bx = rng.random_range(-180..180);
            let ay = rng.random_range(-90..90);
            let by = rng.random_range(-90..90);
            let a = rect(ax, ay, ax + rng.random_range(0..20), ay + rng.random_range(0..20));
            let b = rect(bx, by, bx + rng.random_range(0..20), by + rng.random_range(0..20));
            assert!(box_dist(&a, &b, true) <= box_dist(&a, &b, false), "a={a:?} b={b:?}");
        }
    }

    #[test]
    fn test_wrap_leaves_y_alone() {
        let a = Rect::point(0, 170);
        let b = Rect::point(0, -170);
        assert_eq!(box_dist(&a, &b, true), 340 * 340);
    }

    #[test]
    fn test_extreme_coordinates_saturate() {
        let a = Rect::point(i32::MIN, i32::MIN);
        let b = Rect::point(i32::MAX, i32::MAX);
        assert_eq!(box_dist(&a, &b, false), u64::MAX);
        assert_eq!(box_dist(&a, &b, true), u64::MAX);

        let c = Rect::point(i32::MIN, 0);
        let d = Rect::point(i32::MAX, 0);
        let gap = u64::from(u32::MAX);
        assert_eq!(box_dist(&c, &d, false), gap * gap);
    }

    #[test]
    fn test_item_override_only_applies_to_leaves() {
        let metric = BoxDistance::<u32>::new(Rect::point(0, 0))
            .item_distance(|_, item| u64::from(*item) * 1000);
        let r = rect(3, 4, 3, 4);

        let leaf: Candidate<u32, ()> = Candidate::Leaf { rect: r, item: 7 };
        let node: Candidate<u32, ()> = Candidate::Internal { rect: r, node: () };

        assert_eq!(metric.score(&leaf), 7000);
        assert_eq!(metric.score(&node), 25);
    }

    #[test]
    fn test_metric_without_override_scores_boxes() {
        let metric = BoxDistance::<u32>::new(Rect::point(0, 0)).wrap_x(true);
        let leaf: Candidate<u32, ()> = Candidate::Leaf { rect: Rect::point(-355, 0), item: 1 };
        assert_eq!(metric.score(&leaf), 25);
        assert_eq!(metric.item(&Rect::point(-355, 0), &1), 25);
        assert_eq!(metric.query(), Rect::point(0, 0));
    }

    #[test]
    fn test_debug_hides_closure() {
        let metric = BoxDistance::<u32>::new(Rect::point(1, 2)).item_distance(|_, _| 0);
        let text = format!("{metric:?}");
        assert!(text.contains("item_dist: true"), "{text}");
    }
}
