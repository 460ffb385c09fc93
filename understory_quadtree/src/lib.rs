// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: a 2D point index for proximity hit-testing.
//!
//! Understory Quadtree stores a changing set of points, each with a user payload,
//! and answers two kinds of queries:
//!
//! - **Nearest within radius**: the stored point closest to `(x, y)` whose distance
//!   is at most `r`, or nothing.
//! - **Region**: every stored point inside an axis-aligned rectangle, edges inclusive.
//!
//! Points can be inserted, moved, and removed through generational [`Key`]s, or the
//! whole set can be dropped with [`PointIndexGeneric::remove_all`] and repopulated.
//!
//! It is generic over the scalar type `T` (`f32`, `f64`, `i64`) and does not depend on
//! any geometry crate. Distances are compared squared in a widened accumulator, so no
//! floating-point math library is needed.
//!
//! # Example
//!
//! ```rust
//! use understory_quadtree::{Aabb2D, PointIndex};
//!
//! let bounds = Aabb2D::new(0.0, 0.0, 800.0, 600.0);
//! let mut idx = PointIndex::build(
//!     [(10.0, 10.0, 0_u32), (12.0, 11.0, 1), (500.0, 500.0, 2)],
//!     bounds,
//! )
//! .unwrap();
//!
//! // Hover near the first two points.
//! let hit = idx.find_nearest(11.0, 10.5, 30.0).unwrap().unwrap();
//! assert_eq!(hit.payload, 0);
//!
//! // Too far from everything.
//! assert!(idx.find_nearest(11.0, 10.5, 1.0).unwrap().is_none());
//!
//! // Drag point 0 somewhere else.
//! idx.update(hit.key, 200.0, 200.0).unwrap();
//! let moved = idx.find_nearest(201.0, 199.0, 5.0).unwrap().unwrap();
//! assert_eq!(moved.payload, 0);
//!
//! // Brush a rectangle.
//! let picked: Vec<_> = idx
//!     .query_rect(Aabb2D::new(0.0, 0.0, 300.0, 300.0))
//!     .unwrap()
//!     .map(|(_, id)| id)
//!     .collect();
//! assert_eq!(picked, [0, 1]);
//! ```
//!
//! ## Bounds
//!
//! The index has a bounding rectangle. What happens to a point outside of it is
//! decided by [`BoundsPolicy`]: reject it (default), clamp it onto the nearest edge,
//! or extend the bounds by doubling toward it.
//!
//! ## Ties
//!
//! When several points are equally close, the one in the lowest slot wins. Slots are
//! assigned in insertion order on a fresh or cleared index, so after a rebuild the
//! earliest input point wins. Both backends follow this rule.
//!
//! ## Choosing a backend
//!
//! - `Quadtree` (default): point quadtree with bucketed leaves, a depth cap for
//!   coincident points, and leaf merging on removal. See [`QuadtreeConfig`].
//! - `FlatVec`: linear scans. Good for a handful of points, and a convenient
//!   reference when testing other backends.
//!
//! ### Float semantics
//!
//! NaN and infinite coordinates are rejected with [`IndexError::NonFinite`].

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod error;
mod index;
mod types;

pub use backend::{Backend, Nearest};
pub use backends::QuadtreeConfig;
pub use error::IndexError;
pub use index::{BoundsPolicy, FlatIndex, Hit, Key, PointIndex, PointIndexGeneric};
pub use types::{Aabb2D, Quadrant, Scalar, ScalarAcc, distance_squared};
