//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use atlas_nearby::prelude::*;
//! ```

pub use crate::{BoxDistance, Candidate, Distance, HilbertRTreeI32, Rect, SpatialTree, nearby};
