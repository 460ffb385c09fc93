// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets.
//!
//! It is also the reference answer for the quadtree: every query is an
//! exhaustive scan in slot order.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::{Backend, Nearest, offer};
use crate::types::{Aabb2D, Scalar, distance_squared};

/// Flat vector backend with linear scans.
pub struct FlatVec<T: Scalar> {
    entries: Vec<Option<(T, T)>>,
}

impl<T: Scalar> Default for FlatVec<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Scalar> Debug for FlatVec<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("FlatVec")
            .field("total_slots", &total)
            .field("alive", &alive)
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> Backend<T> for FlatVec<T> {
    fn insert(&mut self, slot: usize, x: T, y: T) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some((x, y));
    }

    fn update(&mut self, slot: usize, x: T, y: T) {
        if let Some(e) = self.entries.get_mut(slot) {
            *e = Some((x, y));
        }
    }

    fn remove(&mut self, slot: usize) {
        if let Some(e) = self.entries.get_mut(slot) {
            *e = None;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn rebound(&mut self, _bounds: Aabb2D<T>) {}

    fn nearest(&self, x: T, y: T, max_distance_squared: T::Acc) -> Option<Nearest<T::Acc>> {
        let mut best = None;
        for (i, slot) in self.entries.iter().enumerate() {
            if let Some((px, py)) = *slot {
                let d = distance_squared(px, py, x, y);
                if d <= max_distance_squared {
                    offer(&mut best, i, d);
                }
            }
        }
        best
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D<T>, mut f: F) {
        for (i, slot) in self.entries.iter().enumerate() {
            if let Some((px, py)) = *slot
                && rect.contains_point(px, py)
            {
                f(i);
            }
        }
    }
}
