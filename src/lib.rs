//! # atlas-nearby - best-first nearest-neighbor traversal
//!
//! Incremental k-nearest-neighbor search over a hierarchical index of 2D
//! `i32` rectangles. Items come back nearest first, one at a time, and the
//! caller decides when to stop, so "the 10 closest" only touches the part
//! of the tree needed to prove they are the closest.
//!
//! ## Features
//!
//! - **Best-first traversal**: [`nearby()`] works over any [`SpatialTree`]
//! - **Admissible box distance**: squared gap distance that never overestimates
//!   for internal nodes, so results are always in non-decreasing order
//! - **Antimeridian wrap**: optional cylindrical axis 0 with period 360
//! - **Exact item distances**: plug your own distance for stored items
//! - **Static Hilbert R-tree**: [`HilbertRTreeI32`] as a ready-made index
//!
//! ## Quick Start
//!
//! ```rust
//! use atlas_nearby::prelude::*;
//!
//! let mut tree = HilbertRTreeI32::new();
//! tree.add(170, 30, 172, 32);    // Item 0: just west of the antimeridian
//! tree.add(-177, 30, -176, 31);  // Item 1: just east of it
//! tree.add(0, 0, 1, 1);          // Item 2: far away
//! tree.build();
//!
//! // Walk items nearest first, stop after two
//! let query = Rect::point(179, 31);
//! let mut found = Vec::new();
//! tree.nearby(&BoxDistance::new(query).wrap_x(true), |_rect, id, dist| {
//!     found.push((id, dist));
//!     found.len() < 2
//! });
//! assert_eq!(found, vec![(1, 16), (0, 49)]);
//! ```
//!
//! ## How It Works
//!
//! The traversal keeps a min-heap of everything it has seen but not yet
//! handed out: stored items scored by their distance, and unexpanded
//! subtrees scored by the distance to their bounding box. Popping a subtree
//! asks the tree for its children; popping an item passes it to the caller.
//! A subtree's box distance is a lower bound for everything inside it, so
//! once an item reaches the head of the heap nothing unseen can be closer.

pub mod distance;
pub mod error;
pub mod hilbert_rtree_i32;
pub mod nearby;
pub mod prelude;
pub mod queue;
pub mod rect;

mod component_tests_i32;

pub use distance::{BoxDistance, Distance, ItemDistanceFn, WRAP_PERIOD, box_dist};
pub use error::{AtlasError, Result};
pub use hilbert_rtree_i32::{DEFAULT_NODE_SIZE, HilbertRTreeI32};
pub use nearby::{Candidate, SpatialTree, nearby};
pub use queue::{NearbyQueue, QueueEntry};
pub use rect::Rect;
