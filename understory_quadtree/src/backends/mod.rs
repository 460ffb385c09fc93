// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `quadtree`: point quadtree with leaf buckets, a depth cap, and leaf merging on removal.
//! - `flatvec`: flat vector with linear scans (small, simple; the reference for the quadtree).
//!
//! Both backends resolve nearest-point ties to the lowest slot, so swapping one for
//! the other never changes query answers.

pub(crate) mod flatvec;
pub(crate) mod quadtree;

pub use flatvec::FlatVec;
pub use quadtree::{Quadtree, QuadtreeConfig};

/// Quadtree backend over `f32` coordinates.
pub type QuadtreeF32 = Quadtree<f32>;
/// Quadtree backend over `f64` coordinates.
pub type QuadtreeF64 = Quadtree<f64>;
/// Quadtree backend over `i64` coordinates.
pub type QuadtreeI64 = Quadtree<i64>;
