// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial point indexing implementations.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::types::{Aabb2D, Scalar};

/// Result of a nearest-point search inside a backend.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Nearest<A> {
    /// Slot of the winning point.
    pub slot: usize,
    /// Squared distance from the query point.
    pub distance_squared: A,
}

impl<A: PartialOrd> Nearest<A> {
    /// Whether a candidate beats the current best.
    ///
    /// A strictly smaller distance wins; on equal distance the lower slot wins.
    #[inline]
    pub fn is_beaten_by(&self, slot: usize, distance_squared: &A) -> bool {
        *distance_squared < self.distance_squared
            || (*distance_squared == self.distance_squared && slot < self.slot)
    }
}

/// Offer a candidate to a running best, keeping the winner.
#[inline]
pub(crate) fn offer<A: PartialOrd + Copy>(
    best: &mut Option<Nearest<A>>,
    slot: usize,
    distance_squared: A,
) {
    match best {
        Some(b) if !b.is_beaten_by(slot, &distance_squared) => {}
        _ => {
            *best = Some(Nearest {
                slot,
                distance_squared,
            });
        }
    }
}

/// Spatial backend abstraction used by [`PointIndexGeneric`][crate::PointIndexGeneric].
///
/// The index owns payloads and generations; backends only see slot numbers and
/// coordinates. Callers guarantee that every inserted point lies inside the
/// bounds last passed to [`rebound`][Backend::rebound].
pub trait Backend<T: Scalar> {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, x: T, y: T);

    /// Move an existing slot.
    fn update(&mut self, slot: usize, x: T, y: T);

    /// Remove a slot from the spatial structure.
    fn remove(&mut self, slot: usize);

    /// Clear all spatial structures, keeping the bounds.
    fn clear(&mut self);

    /// Replace the bounds and re-home every stored slot.
    fn rebound(&mut self, bounds: Aabb2D<T>);

    /// Find the slot closest to `(x, y)` with a squared distance of at most `max_distance_squared`.
    ///
    /// Ties on distance must resolve to the lowest slot.
    fn nearest(&self, x: T, y: T, max_distance_squared: T::Acc) -> Option<Nearest<T::Acc>>;

    /// Visit slots whose point lies inside the rectangle (edges inclusive).
    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D<T>, f: F);

    /// Query slots whose point lies inside the rectangle.
    ///
    /// The default implementation collects [`visit_rect`][Backend::visit_rect].
    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        self.visit_rect(rect, |i| out.push(i));
        Box::new(out.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_prefers_closer_then_lower_slot() {
        let mut best = None;
        offer(&mut best, 4, 9.0_f64);
        offer(&mut best, 7, 4.0);
        assert_eq!(best.map(|b| b.slot), Some(7));

        // Same distance, higher slot: keep.
        offer(&mut best, 9, 4.0);
        assert_eq!(best.map(|b| b.slot), Some(7));

        // Same distance, lower slot: replace.
        offer(&mut best, 2, 4.0);
        assert_eq!(best.map(|b| b.slot), Some(2));
    }
}
