//! Axis-aligned integer rectangles.

use crate::error::{AtlasError, Result};

/// Axis-aligned rectangle with inclusive `i32` bounds on two axes.
///
/// `min[axis] <= max[axis]` is expected to hold on both axes. [`Rect::new`]
/// does not check it; use [`Rect::try_new`] for untrusted input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Lower corner: `[min_x, min_y]`
    pub min: [i32; 2],
    /// Upper corner: `[max_x, max_y]`
    pub max: [i32; 2],
}

impl Rect {
    /// Creates a rectangle from its corners without validation.
    ///
    /// # Example
    /// ```
    /// use atlas_nearby::Rect;
    /// let r = Rect::new([0, 0], [10, 5]);
    /// assert_eq!(r.max, [10, 5]);
    /// ```
    #[must_use]
    pub const fn new(min: [i32; 2], max: [i32; 2]) -> Self {
        Self { min, max }
    }

    /// Creates a rectangle, rejecting corners with `min > max` on any axis.
    ///
    /// # Errors
    /// Returns [`AtlasError::InvalidRect`] when the corners are inverted.
    ///
    /// # Example
    /// ```
    /// use atlas_nearby::Rect;
    /// assert!(Rect::try_new([0, 0], [1, 1]).is_ok());
    /// assert!(Rect::try_new([2, 0], [1, 1]).is_err());
    /// ```
    pub fn try_new(min: [i32; 2], max: [i32; 2]) -> Result<Self> {
        if min[0] > max[0] || min[1] > max[1] {
            return Err(AtlasError::InvalidRect { min, max });
        }
        Ok(Self { min, max })
    }

    /// Zero-area rectangle at a single point.
    #[must_use]
    pub const fn point(x: i32, y: i32) -> Self {
        Self { min: [x, y], max: [x, y] }
    }

    /// Rectangle that bounds nothing; the identity for [`Rect::union`].
    pub(crate) const EMPTY: Self = Self {
        min: [i32::MAX, i32::MAX],
        max: [i32::MIN, i32::MIN],
    };

    /// Returns true when the rectangles overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !(other.min[0] > self.max[0]
            || other.max[0] < self.min[0]
            || other.min[1] > self.max[1]
            || other.max[1] < self.min[1])
    }

    /// Returns true when `other` lies entirely inside `self` (edges inclusive).
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.min[0] <= other.min[0]
            && self.min[1] <= other.min[1]
            && self.max[0] >= other.max[0]
            && self.max[1] >= other.max[1]
    }

    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_inverted_axes() {
        assert!(Rect::try_new([0, 0], [0, 0]).is_ok());
        assert_eq!(
            Rect::try_new([0, 5], [3, 4]),
            Err(AtlasError::InvalidRect { min: [0, 5], max: [3, 4] })
        );
        assert!(Rect::try_new([4, 0], [3, 9]).is_err());
    }

    #[test]
    fn test_intersects_touching_edges() {
        let a = Rect::new([0, 0], [10, 10]);
        assert!(a.intersects(&Rect::new([10, 10], [20, 20])));
        assert!(a.intersects(&Rect::new([2, 2], [3, 3])));
        assert!(!a.intersects(&Rect::new([11, 0], [20, 10])));
        assert!(!a.intersects(&Rect::new([0, -5], [10, -1])));
    }

    #[test]
    fn test_contains() {
        let a = Rect::new([0, 0], [10, 10]);
        assert!(a.contains(&Rect::new([0, 0], [10, 10])));
        assert!(a.contains(&Rect::point(5, 5)));
        assert!(!a.contains(&Rect::new([5, 5], [11, 6])));
    }

    #[test]
    fn test_union_with_empty_is_identity() {
        let a = Rect::new([-3, 4], [7, 9]);
        assert_eq!(Rect::EMPTY.union(&a), a);
        assert_eq!(
            a.union(&Rect::point(20, -1)),
            Rect::new([-3, -1], [20, 9])
        );
    }
}
