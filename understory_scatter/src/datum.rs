// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point identity and the circle record tracked by a session.

use core::fmt;

use kurbo::{Circle, Point};

/// Caller-chosen identifier of a point. Must be unique within one point set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u32);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A circle in the scatter: identity, center, radius, and an arbitrary payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Datum<D = ()> {
    /// Identifier, unique within the point set.
    pub id: PointId,
    /// Center in container coordinates.
    pub position: Point,
    /// Display radius. Only carried for presentation; picking uses the center.
    pub radius: f64,
    /// Application data.
    pub data: D,
}

impl<D> Datum<D> {
    /// Create a datum with a payload.
    pub fn new(id: PointId, position: Point, radius: f64, data: D) -> Self {
        Self {
            id,
            position,
            radius,
            data,
        }
    }

    /// The circle to draw for this datum.
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }
}

impl Datum<()> {
    /// Create a datum without a payload.
    pub fn circle_at(id: u32, x: f64, y: f64, radius: f64) -> Self {
        Self::new(PointId(id), Point::new(x, y), radius, ())
    }
}
