// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
///
/// All containment tests treat the edges as part of the box.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    #[inline(always)]
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Whether this AABB contains the point (edges inclusive).
    #[inline]
    pub fn contains_point(&self, x: T, y: T) -> bool {
        self.min_x <= x && self.min_y <= y && x <= self.max_x && y <= self.max_y
    }

    /// Determines whether this AABB overlaps with another in any way.
    ///
    /// Note that the edge of the AABB is considered to be part of itself, meaning
    /// that two AABBs that share an edge are considered to overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use understory_quadtree::Aabb2D;
    ///
    /// let aabb1 = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
    /// let aabb2 = Aabb2D::new(10.0, 0.0, 20.0, 10.0);
    /// assert!(aabb1.overlaps(&aabb2));
    ///
    /// let aabb2 = Aabb2D::new(11.0, 0.0, 20.0, 10.0);
    /// assert!(!aabb1.overlaps(&aabb2));
    /// ```
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Return true if the AABB is empty or inverted (no area). Assumes no NaN.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }

    /// Return true if the AABB is inverted on either axis.
    ///
    /// Degenerate boxes (a line or a single point) are not inverted.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    /// Move a point onto the closest location inside this AABB.
    #[inline]
    pub fn clamp_point(&self, x: T, y: T) -> (T, T) {
        (
            min_t(max_t(x, self.min_x), self.max_x),
            min_t(max_t(y, self.min_y), self.max_y),
        )
    }
}

/// One of the four children of a split rectangle.
///
/// The y axis grows downward, so "north" is the half with the smaller y.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// `x < mid_x`, `y < mid_y`.
    NorthWest = 0,
    /// `x >= mid_x`, `y < mid_y`.
    NorthEast = 1,
    /// `x < mid_x`, `y >= mid_y`.
    SouthWest = 2,
    /// `x >= mid_x`, `y >= mid_y`.
    SouthEast = 3,
}

impl Quadrant {
    /// All quadrants in child-slot order.
    pub const ALL: [Self; 4] = [
        Self::NorthWest,
        Self::NorthEast,
        Self::SouthWest,
        Self::SouthEast,
    ];

    /// Child slot of this quadrant (bit 0 is east, bit 1 is south).
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl<T: Scalar> Aabb2D<T> {
    /// Create an AABB from origin and size.
    #[inline]
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: T::add(x, w),
            max_y: T::add(y, h),
        }
    }

    /// Whether all four edges are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        T::is_finite(self.min_x)
            && T::is_finite(self.min_y)
            && T::is_finite(self.max_x)
            && T::is_finite(self.max_y)
    }

    /// The split point used when subdividing this AABB.
    #[inline]
    pub fn center(&self) -> (T, T) {
        (
            T::mid(self.min_x, self.max_x),
            T::mid(self.min_y, self.max_y),
        )
    }

    /// The quadrant of this AABB that a point belongs to.
    ///
    /// Points on the vertical split line go east and points on the horizontal
    /// split line go south.
    #[inline]
    pub fn quadrant_of(&self, x: T, y: T) -> Quadrant {
        let (cx, cy) = self.center();
        match (x >= cx, y >= cy) {
            (false, false) => Quadrant::NorthWest,
            (true, false) => Quadrant::NorthEast,
            (false, true) => Quadrant::SouthWest,
            (true, true) => Quadrant::SouthEast,
        }
    }

    /// The sub-rectangle covered by a quadrant.
    #[inline]
    pub fn quadrant(&self, q: Quadrant) -> Self {
        let (cx, cy) = self.center();
        match q {
            Quadrant::NorthWest => Self::new(self.min_x, self.min_y, cx, cy),
            Quadrant::NorthEast => Self::new(cx, self.min_y, self.max_x, cy),
            Quadrant::SouthWest => Self::new(self.min_x, cy, cx, self.max_y),
            Quadrant::SouthEast => Self::new(cx, cy, self.max_x, self.max_y),
        }
    }

    /// Squared Euclidean distance from a point to the closest point of this AABB.
    ///
    /// This is zero when the point is inside, the squared gap to the nearest edge
    /// when the point is outside on one axis, and the squared distance to the
    /// nearest corner when it is outside on both.
    #[inline]
    pub fn distance_squared_to_point(&self, x: T, y: T) -> T::Acc {
        let dx = axis_gap(self.min_x, self.max_x, x);
        let dy = axis_gap(self.min_y, self.max_y, y);
        T::sum_of_squares(dx, dy)
    }

    /// Grow this AABB until it covers the point.
    ///
    /// Each step doubles the extent on every axis where the point is still
    /// outside, growing toward the point. Requires a non-empty AABB.
    ///
    /// Returns `None` if the point is not finite or growing would overflow
    /// the scalar range to a non-finite edge.
    pub fn grown_to_cover(&self, x: T, y: T) -> Option<Self> {
        debug_assert!(!self.is_empty(), "cannot grow an empty AABB");
        if !T::is_finite(x) || !T::is_finite(y) {
            return None;
        }
        let mut out = *self;
        while !out.contains_point(x, y) {
            let w = T::sub(out.max_x, out.min_x);
            let h = T::sub(out.max_y, out.min_y);
            if x < out.min_x {
                out.min_x = T::sub(out.min_x, w);
            } else if x > out.max_x {
                out.max_x = T::add(out.max_x, w);
            }
            if y < out.min_y {
                out.min_y = T::sub(out.min_y, h);
            } else if y > out.max_y {
                out.max_y = T::add(out.max_y, h);
            }
            if !out.is_finite() {
                return None;
            }
        }
        Some(out)
    }
}

#[inline]
fn axis_gap<T: Scalar>(min: T, max: T, v: T) -> T::Acc {
    if v < min {
        T::widen(min) - T::widen(v)
    } else if v > max {
        T::widen(v) - T::widen(max)
    } else {
        T::widen(T::zero())
    }
}

/// Squared Euclidean distance between two points, in the widened accumulator type.
#[inline]
pub fn distance_squared<T: Scalar>(ax: T, ay: T, bx: T, by: T) -> T::Acc {
    let dx = T::widen(ax) - T::widen(bx);
    let dy = T::widen(ay) - T::widen(by);
    T::sum_of_squares(dx, dy)
}

/// Numeric scalar abstraction for point coordinates.
///
/// Distances are compared squared in the widened accumulator type (e.g., f32→f64,
/// i64→i128), so no square roots are needed and the crate stays `no_std`.
/// For `i64`, coordinate differences always fit in an `i128`; their squared sum
/// saturates at `i128::MAX`, which is farther than any valid search radius.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type for squared distances.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Midpoint between a and b (the quadrant split line).
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Whether the value is finite. Always true for integers.
    fn is_finite(v: Self) -> bool;

    /// `dx * dx + dy * dy` in the accumulator type.
    fn sum_of_squares(dx: Self::Acc, dy: Self::Acc) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline(always)]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        v.is_finite()
    }

    #[inline]
    fn sum_of_squares(dx: Self::Acc, dy: Self::Acc) -> Self::Acc {
        dx * dx + dy * dy
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline(always)]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline(always)]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        v.is_finite()
    }

    #[inline]
    fn sum_of_squares(dx: Self::Acc, dy: Self::Acc) -> Self::Acc {
        dx * dx + dy * dy
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline(always)]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as i128
    }

    #[inline(always)]
    fn is_finite(_v: Self) -> bool {
        true
    }

    #[inline]
    fn sum_of_squares(dx: Self::Acc, dy: Self::Acc) -> Self::Acc {
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }
}

/// Helper alias for the widened accumulator type `Scalar::Acc` associated with a `T: Scalar`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}
