// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by [`PointIndexGeneric`][crate::PointIndexGeneric].

use core::fmt;

use crate::index::Key;
use crate::types::Aabb2D;

/// Usage error from an index operation.
///
/// Empty results are never errors; these only describe bad input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum IndexError<T> {
    /// A coordinate was NaN or infinite.
    NonFinite {
        /// Offending x.
        x: T,
        /// Offending y.
        y: T,
    },
    /// A stored point fell outside the bounds under
    /// [`BoundsPolicy::Reject`][crate::BoundsPolicy::Reject], or a query point
    /// fell outside the bounds.
    OutOfBounds {
        /// Offending x.
        x: T,
        /// Offending y.
        y: T,
        /// Bounds at the time of the call.
        bounds: Aabb2D<T>,
    },
    /// A search radius was negative or not finite.
    InvalidRadius(T),
    /// Bounds were empty, inverted, or not finite.
    InvalidBounds(Aabb2D<T>),
    /// A query rectangle was inverted or not finite.
    InvalidRect(Aabb2D<T>),
    /// The key does not refer to a live entry.
    StaleKey(Key),
}

impl<T: fmt::Debug> fmt::Display for IndexError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { x, y } => write!(f, "coordinates ({x:?}, {y:?}) are not finite"),
            Self::OutOfBounds { x, y, bounds } => {
                write!(f, "point ({x:?}, {y:?}) lies outside of {bounds:?}")
            }
            Self::InvalidRadius(r) => write!(f, "search radius {r:?} is negative or not finite"),
            Self::InvalidBounds(b) => write!(f, "bounds {b:?} are empty, inverted, or not finite"),
            Self::InvalidRect(r) => write!(f, "query rectangle {r:?} is inverted or not finite"),
            Self::StaleKey(k) => write!(f, "key {k:?} does not refer to a live entry"),
        }
    }
}

impl<T: fmt::Debug> core::error::Error for IndexError<T> {}
