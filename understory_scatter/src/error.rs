// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by [`Session`][crate::Session].

use core::fmt;

use kurbo::Size;
use understory_quadtree::IndexError;

use crate::datum::PointId;

/// Usage error from a session operation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SessionError {
    /// The underlying index rejected the input.
    Index(IndexError<f64>),
    /// Two points in one set share an id.
    DuplicateId(PointId),
    /// No point with this id is in the current set.
    UnknownId(PointId),
    /// The viewport has a zero, negative, or non-finite dimension.
    InvalidViewport(Size),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(e) => write!(f, "index error: {e}"),
            Self::DuplicateId(id) => write!(f, "point id {id} appears more than once"),
            Self::UnknownId(id) => write!(f, "no point with id {id}"),
            Self::InvalidViewport(size) => write!(f, "viewport {size:?} has no area"),
        }
    }
}

impl core::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Index(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IndexError<f64>> for SessionError {
    fn from(e: IndexError<f64>) -> Self {
        Self::Index(e)
    }
}
