// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `PointIndex` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::{FlatVec, Quadtree, QuadtreeConfig};
use crate::error::IndexError;
use crate::types::{Aabb2D, Scalar};

/// Generational handle for entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are intentionally 32-bit; higher bits are truncated by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What to do with a point that falls outside the index bounds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoundsPolicy {
    /// Return [`IndexError::OutOfBounds`] and leave the index unchanged.
    #[default]
    Reject,
    /// Move the point onto the nearest edge of the bounds and store it there.
    Clamp,
    /// Double the bounds toward the point until it is covered, then re-home all points.
    Extend,
}

/// A nearest-point match.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit<T: Scalar, P> {
    /// Handle of the matched entry.
    pub key: Key,
    /// Stored x.
    pub x: T,
    /// Stored y.
    pub y: T,
    /// Payload of the matched entry.
    pub payload: P,
    /// Squared distance from the query point, in the widened accumulator type.
    pub distance_squared: T::Acc,
}

#[derive(Clone, Debug)]
struct Entry<T, P> {
    x: T,
    y: T,
    payload: P,
}

#[derive(Clone, Debug)]
struct Slot<T, P> {
    generation: u32,
    entry: Option<Entry<T, P>>,
}

/// A point index parameterized by a spatial backend.
///
/// Payloads live here; the backend only sees slot numbers and coordinates.
/// Nearest-point ties resolve to the lowest slot. Slots are handed out in
/// insertion order on a fresh or cleared index, so after [`build`][PointIndex::build]
/// or [`remove_all`][Self::remove_all] + [`add_all`][Self::add_all] the earliest
/// input point wins a tie.
#[derive(Debug)]
pub struct PointIndexGeneric<T: Scalar, P: Copy + Debug, B: Backend<T>> {
    bounds: Aabb2D<T>,
    policy: BoundsPolicy,
    slots: Vec<Slot<T, P>>,
    free_list: Vec<usize>,
    len: usize,
    backend: B,
}

/// Default index using the quadtree backend.
pub type PointIndex<T, P> = PointIndexGeneric<T, P, Quadtree<T>>;

/// Index using the linear-scan backend.
pub type FlatIndex<T, P> = PointIndexGeneric<T, P, FlatVec<T>>;

fn check_bounds<T: Scalar>(bounds: Aabb2D<T>) -> Result<(), IndexError<T>> {
    if !bounds.is_finite() || bounds.is_empty() {
        return Err(IndexError::InvalidBounds(bounds));
    }
    Ok(())
}

fn check_finite<T: Scalar>(x: T, y: T) -> Result<(), IndexError<T>> {
    if !T::is_finite(x) || !T::is_finite(y) {
        return Err(IndexError::NonFinite { x, y });
    }
    Ok(())
}

impl<T: Scalar, P: Copy + Debug> PointIndex<T, P> {
    /// Create an empty quadtree index that rejects out-of-bounds points.
    pub fn new(bounds: Aabb2D<T>) -> Result<Self, IndexError<T>> {
        Self::with_config(bounds, QuadtreeConfig::default(), BoundsPolicy::Reject)
    }

    /// Create an empty quadtree index with explicit tuning and bounds policy.
    pub fn with_config(
        bounds: Aabb2D<T>,
        config: QuadtreeConfig,
        policy: BoundsPolicy,
    ) -> Result<Self, IndexError<T>> {
        check_bounds(bounds)?;
        Self::with_backend(bounds, policy, Quadtree::new(bounds, config))
    }

    /// Build an index from scratch containing exactly the given points.
    ///
    /// Out-of-bounds points are rejected; nothing is built in that case.
    pub fn build<I>(points: I, bounds: Aabb2D<T>) -> Result<Self, IndexError<T>>
    where
        I: IntoIterator<Item = (T, T, P)>,
    {
        let mut idx = Self::new(bounds)?;
        idx.add_all(points)?;
        Ok(idx)
    }
}

impl<T: Scalar, P: Copy + Debug> FlatIndex<T, P> {
    /// Create an empty linear-scan index.
    pub fn flat(bounds: Aabb2D<T>, policy: BoundsPolicy) -> Result<Self, IndexError<T>> {
        Self::with_backend(bounds, policy, FlatVec::default())
    }
}

impl<T, P, B> PointIndexGeneric<T, P, B>
where
    T: Scalar,
    P: Copy + Debug,
    B: Backend<T>,
{
    /// Create an empty index using an explicit backend instance.
    ///
    /// The backend is cleared and re-bounded to `bounds`.
    pub fn with_backend(
        bounds: Aabb2D<T>,
        policy: BoundsPolicy,
        mut backend: B,
    ) -> Result<Self, IndexError<T>> {
        check_bounds(bounds)?;
        backend.clear();
        backend.rebound(bounds);
        Ok(Self {
            bounds,
            policy,
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            backend,
        })
    }

    /// Current bounds.
    pub fn bounds(&self) -> Aabb2D<T> {
        self.bounds
    }

    /// Policy applied to out-of-bounds points.
    pub fn policy(&self) -> BoundsPolicy {
        self.policy
    }

    /// The spatial backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reserve space for at least `n` more entries.
    pub fn reserve(&mut self, n: usize) {
        self.slots.reserve(n);
    }

    // Apply the bounds policy to a finite point, growing the bounds if needed.
    fn place(&mut self, x: T, y: T) -> Result<(T, T), IndexError<T>> {
        check_finite(x, y)?;
        if self.bounds.contains_point(x, y) {
            return Ok((x, y));
        }
        match self.policy {
            BoundsPolicy::Reject => Err(IndexError::OutOfBounds {
                x,
                y,
                bounds: self.bounds,
            }),
            BoundsPolicy::Clamp => Ok(self.bounds.clamp_point(x, y)),
            BoundsPolicy::Extend => {
                self.bounds = self
                    .bounds
                    .grown_to_cover(x, y)
                    .ok_or(IndexError::InvalidBounds(self.bounds))?;
                self.backend.rebound(self.bounds);
                Ok((x, y))
            }
        }
    }

    /// Insert a new point with payload. Returns a stable handle `Key`.
    pub fn insert(&mut self, x: T, y: T, payload: P) -> Result<Key, IndexError<T>> {
        let (x, y) = self.place(x, y)?;
        let entry = Entry { x, y, payload };
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx].entry = Some(entry);
            idx
        } else {
            self.slots.push(Slot {
                generation: 1,
                entry: Some(entry),
            });
            self.slots.len() - 1
        };
        self.len += 1;
        self.backend.insert(idx, x, y);
        Ok(Key::new(idx, self.slots[idx].generation))
    }

    /// Insert every point, returning keys in input order.
    ///
    /// All points are validated before any is inserted, so on error the index
    /// is unchanged.
    pub fn add_all<I>(&mut self, points: I) -> Result<Vec<Key>, IndexError<T>>
    where
        I: IntoIterator<Item = (T, T, P)>,
    {
        let points: Vec<(T, T, P)> = points.into_iter().collect();
        let mut grown = self.bounds;
        for &(x, y, _) in &points {
            check_finite(x, y)?;
            if grown.contains_point(x, y) {
                continue;
            }
            match self.policy {
                BoundsPolicy::Reject => {
                    return Err(IndexError::OutOfBounds {
                        x,
                        y,
                        bounds: self.bounds,
                    });
                }
                BoundsPolicy::Clamp => {}
                BoundsPolicy::Extend => {
                    grown = grown
                        .grown_to_cover(x, y)
                        .ok_or(IndexError::InvalidBounds(grown))?;
                }
            }
        }
        self.reserve(points.len());
        let mut keys = Vec::with_capacity(points.len());
        for (x, y, payload) in points {
            keys.push(self.insert(x, y, payload)?);
        }
        Ok(keys)
    }

    /// Move an existing point.
    pub fn update(&mut self, key: Key, x: T, y: T) -> Result<(), IndexError<T>> {
        if self.entry(key).is_none() {
            return Err(IndexError::StaleKey(key));
        }
        let (x, y) = self.place(x, y)?;
        if let Some(e) = self.slots[key.idx()].entry.as_mut() {
            e.x = x;
            e.y = y;
        }
        self.backend.update(key.idx(), x, y);
        Ok(())
    }

    /// Remove an existing point, returning its payload.
    pub fn remove(&mut self, key: Key) -> Option<P> {
        self.entry(key)?;
        let slot = &mut self.slots[key.idx()];
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(key.idx());
        self.len -= 1;
        self.backend.remove(key.idx());
        Some(entry.payload)
    }

    /// Remove every point, keeping the bounds.
    ///
    /// Keys handed out before this call become stale. The next inserts reuse
    /// slots from zero upward, so input order decides ties again.
    pub fn remove_all(&mut self) {
        for slot in &mut self.slots {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free_list.clear();
        self.free_list.extend((0..self.slots.len()).rev());
        self.len = 0;
        self.backend.clear();
    }

    /// Replace the bounds and re-apply the policy to every stored point.
    ///
    /// Under [`BoundsPolicy::Reject`] the call fails without changes if any point
    /// would fall outside. Under [`BoundsPolicy::Extend`] the new bounds are
    /// grown until every point is covered.
    pub fn set_bounds(&mut self, bounds: Aabb2D<T>) -> Result<(), IndexError<T>> {
        check_bounds(bounds)?;
        let mut bounds = bounds;
        for e in self.slots.iter().filter_map(|s| s.entry.as_ref()) {
            if bounds.contains_point(e.x, e.y) {
                continue;
            }
            match self.policy {
                BoundsPolicy::Reject => {
                    return Err(IndexError::OutOfBounds {
                        x: e.x,
                        y: e.y,
                        bounds,
                    });
                }
                BoundsPolicy::Clamp => {}
                BoundsPolicy::Extend => {
                    bounds = bounds
                        .grown_to_cover(e.x, e.y)
                        .ok_or(IndexError::InvalidBounds(bounds))?;
                }
            }
        }
        self.bounds = bounds;
        self.backend.clear();
        self.backend.rebound(bounds);
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if let Some(e) = slot.entry.as_mut() {
                (e.x, e.y) = bounds.clamp_point(e.x, e.y);
                self.backend.insert(idx, e.x, e.y);
            }
        }
        Ok(())
    }

    /// Look up a live entry: its stored coordinates and payload.
    pub fn get(&self, key: Key) -> Option<(T, T, P)> {
        self.entry(key).map(|e| (e.x, e.y, e.payload))
    }

    /// Iterate live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, T, T, P)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.entry
                .as_ref()
                .map(|e| (Key::new(i, s.generation), e.x, e.y, e.payload))
        })
    }

    /// Find the point closest to `(x, y)` within `max_radius` (inclusive).
    ///
    /// Returns `Ok(None)` when no point qualifies. A radius of zero only
    /// matches a point at exactly `(x, y)`. The query point must lie inside
    /// the bounds (edges inclusive); for a viewport index this rejects
    /// negative coordinates.
    pub fn find_nearest(
        &self,
        x: T,
        y: T,
        max_radius: T,
    ) -> Result<Option<Hit<T, P>>, IndexError<T>> {
        check_finite(x, y)?;
        if !self.bounds.contains_point(x, y) {
            return Err(IndexError::OutOfBounds {
                x,
                y,
                bounds: self.bounds,
            });
        }
        if !T::is_finite(max_radius) || max_radius < T::zero() {
            return Err(IndexError::InvalidRadius(max_radius));
        }
        let r = T::widen(max_radius);
        let Some(nearest) = self.backend.nearest(x, y, r * r) else {
            return Ok(None);
        };
        let slot = &self.slots[nearest.slot];
        let e = slot
            .entry
            .as_ref()
            .expect("index invariant violated: backend returned a vacant slot");
        Ok(Some(Hit {
            key: Key::new(nearest.slot, slot.generation),
            x: e.x,
            y: e.y,
            payload: e.payload,
            distance_squared: nearest.distance_squared,
        }))
    }

    /// Query for entries whose point lies inside `rect`, edges inclusive.
    ///
    /// Results come back in ascending slot order.
    pub fn query_rect(
        &self,
        rect: Aabb2D<T>,
    ) -> Result<impl Iterator<Item = (Key, P)> + '_, IndexError<T>> {
        let mut found = Vec::new();
        self.visit_rect_slots(rect, |i| found.push(i))?;
        found.sort_unstable();
        Ok(found.into_iter().filter_map(|i| {
            let s = &self.slots[i];
            s.entry
                .as_ref()
                .map(|e| (Key::new(i, s.generation), e.payload))
        }))
    }

    /// Visit entries whose point lies inside `rect` (does not allocate result storage).
    ///
    /// Calls `f(key, payload)` for each match. The order is backend-dependent.
    pub fn visit_rect<F: FnMut(Key, P)>(
        &self,
        rect: Aabb2D<T>,
        mut f: F,
    ) -> Result<(), IndexError<T>> {
        self.visit_rect_slots(rect, |i| {
            let s = &self.slots[i];
            if let Some(e) = s.entry.as_ref() {
                f(Key::new(i, s.generation), e.payload);
            }
        })
    }

    fn visit_rect_slots<F: FnMut(usize)>(
        &self,
        rect: Aabb2D<T>,
        f: F,
    ) -> Result<(), IndexError<T>> {
        if !rect.is_finite() || rect.is_inverted() {
            return Err(IndexError::InvalidRect(rect));
        }
        self.backend.visit_rect(rect, f);
        Ok(())
    }

    fn entry(&self, key: Key) -> Option<&Entry<T, P>> {
        let s = self.slots.get(key.idx())?;
        if s.generation != key.1 {
            return None;
        }
        s.entry.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn viewport() -> Aabb2D<f64> {
        Aabb2D::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn concrete_scenario() {
        let idx = PointIndex::build(
            [(10.0, 10.0, 0_u32), (12.0, 11.0, 1), (500.0, 500.0, 2)],
            viewport(),
        )
        .unwrap();

        let hit = idx.find_nearest(11.0, 10.5, 30.0).unwrap().unwrap();
        assert_eq!(hit.payload, 0);
        assert!((hit.distance_squared - 1.25).abs() < 1e-12);

        assert!(idx.find_nearest(11.0, 10.5, 1.0).unwrap().is_none());
    }

    #[test]
    fn empty_index_answers_nothing() {
        let idx: PointIndex<f64, u32> = PointIndex::new(viewport()).unwrap();
        assert!(idx.find_nearest(1.0, 1.0, 1000.0).unwrap().is_none());
        assert_eq!(idx.query_rect(viewport()).unwrap().count(), 0);
    }

    #[test]
    fn zero_radius_only_matches_exactly() {
        let idx = PointIndex::build([(10.0, 10.0, 'a'), (20.0, 20.0, 'b')], viewport()).unwrap();
        assert_eq!(
            idx.find_nearest(20.0, 20.0, 0.0).unwrap().map(|h| h.payload),
            Some('b')
        );
        assert!(idx.find_nearest(20.0, 20.000001, 0.0).unwrap().is_none());
    }

    #[test]
    fn ties_go_to_the_earliest_input() {
        // Both points are at distance 5 from (50, 50).
        let idx = PointIndex::build([(53.0, 54.0, 'a'), (47.0, 46.0, 'b')], viewport()).unwrap();
        let hit = idx.find_nearest(50.0, 50.0, 10.0).unwrap().unwrap();
        assert_eq!(hit.payload, 'a');

        let idx = PointIndex::build([(47.0, 46.0, 'b'), (53.0, 54.0, 'a')], viewport()).unwrap();
        let hit = idx.find_nearest(50.0, 50.0, 10.0).unwrap().unwrap();
        assert_eq!(hit.payload, 'b');
    }

    #[test]
    fn bad_queries_are_rejected() {
        let idx: PointIndex<f64, u32> = PointIndex::new(viewport()).unwrap();
        assert!(matches!(
            idx.find_nearest(f64::NAN, 1.0, 5.0),
            Err(IndexError::NonFinite { .. })
        ));
        assert_eq!(
            idx.find_nearest(1.0, 1.0, -1.0).unwrap_err(),
            IndexError::InvalidRadius(-1.0)
        );
        assert!(matches!(
            idx.find_nearest(1.0, 1.0, f64::INFINITY),
            Err(IndexError::InvalidRadius(_))
        ));
        let inverted = Aabb2D::new(10.0, 0.0, 0.0, 10.0);
        assert_eq!(
            idx.query_rect(inverted).err(),
            Some(IndexError::InvalidRect(inverted))
        );
    }

    #[test]
    fn queries_outside_the_bounds_are_rejected() {
        let idx = PointIndex::build([(0.0, 0.0, 0_u32)], viewport()).unwrap();
        assert_eq!(
            idx.find_nearest(-3.0, -4.0, 5.0).unwrap_err(),
            IndexError::OutOfBounds {
                x: -3.0,
                y: -4.0,
                bounds: viewport(),
            }
        );
        assert!(idx.find_nearest(800.5, 10.0, 5.0).is_err());
        // Edges are inside.
        assert_eq!(
            idx.find_nearest(3.0, 4.0, 5.0).unwrap().map(|h| h.payload),
            Some(0)
        );
        assert!(idx.find_nearest(800.0, 600.0, 5.0).unwrap().is_none());
    }

    #[test]
    fn integer_extremes_do_not_overflow() {
        let full = Aabb2D::new(i64::MIN, i64::MIN, i64::MAX, i64::MAX);
        let idx = PointIndex::build([(i64::MIN, i64::MIN, 0_u8)], full).unwrap();
        assert!(idx.find_nearest(i64::MAX, i64::MAX, 1).unwrap().is_none());
        assert!(idx.find_nearest(i64::MAX, i64::MAX, i64::MAX).unwrap().is_none());
        let hit = idx.find_nearest(i64::MIN + 3, i64::MIN + 4, 5).unwrap().unwrap();
        assert_eq!(hit.distance_squared, 25);

        let small = PointIndex::build([(0_i64, 0_i64, 0_u8)], Aabb2D::new(0, 0, 100, 100)).unwrap();
        assert!(matches!(
            small.find_nearest(i64::MIN, i64::MIN, 1),
            Err(IndexError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn extend_stops_at_the_float_range() {
        let bounds = Aabb2D::new(0.0, 0.0, 100.0, 100.0);
        let mut idx: PointIndex<f64, u32> =
            PointIndex::with_config(bounds, QuadtreeConfig::default(), BoundsPolicy::Extend)
                .unwrap();
        let k = idx.insert(50.0, 50.0, 1).unwrap();
        assert_eq!(
            idx.insert(f64::MAX, 50.0, 2).unwrap_err(),
            IndexError::InvalidBounds(bounds)
        );
        assert!(idx.update(k, 50.0, -f64::MAX).is_err());
        assert_eq!(idx.bounds(), bounds);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.get(k), Some((50.0, 50.0, 1)));

        // A batch that cannot be covered inserts nothing.
        let err = idx.add_all([(150.0, 50.0, 3), (50.0, f64::MAX, 4)]);
        assert!(matches!(err, Err(IndexError::InvalidBounds(_))));
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.bounds(), bounds);
    }

    #[test]
    fn bad_bounds_are_rejected() {
        let empty = Aabb2D::new(0.0, 0.0, 0.0, 10.0);
        assert_eq!(
            PointIndex::<f64, u32>::new(empty).unwrap_err(),
            IndexError::InvalidBounds(empty)
        );
        let infinite = Aabb2D::new(0.0, 0.0, f64::INFINITY, 10.0);
        assert!(PointIndex::<f64, u32>::new(infinite).is_err());
    }

    #[test]
    fn reject_policy_leaves_index_unchanged() {
        let mut idx: PointIndex<f64, u32> = PointIndex::new(viewport()).unwrap();
        let err = idx.insert(-1.0, 10.0, 7).unwrap_err();
        assert!(matches!(err, IndexError::OutOfBounds { .. }));
        assert!(idx.is_empty());

        // Batch inserts are validated up front.
        let err = idx.add_all([(1.0, 1.0, 1), (900.0, 1.0, 2)]).unwrap_err();
        assert!(matches!(err, IndexError::OutOfBounds { x, .. } if x == 900.0));
        assert!(idx.is_empty());

        let k = idx.insert(5.0, 5.0, 1).unwrap();
        assert!(idx.update(k, 5.0, 601.0).is_err());
        assert_eq!(idx.get(k), Some((5.0, 5.0, 1)));
    }

    #[test]
    fn clamp_policy_pins_to_edges() {
        let mut idx: PointIndex<f64, u32> =
            PointIndex::with_config(viewport(), QuadtreeConfig::default(), BoundsPolicy::Clamp)
                .unwrap();
        let k = idx.insert(-20.0, 700.0, 1).unwrap();
        assert_eq!(idx.get(k), Some((0.0, 600.0, 1)));
        assert_eq!(idx.bounds(), viewport());
        assert!(idx.find_nearest(0.0, 600.0, 0.0).unwrap().is_some());
    }

    #[test]
    fn extend_policy_grows_bounds() {
        let mut idx: PointIndex<f64, u32> = PointIndex::with_config(
            Aabb2D::new(0.0, 0.0, 100.0, 100.0),
            QuadtreeConfig::default(),
            BoundsPolicy::Extend,
        )
        .unwrap();
        let a = idx.insert(50.0, 50.0, 1).unwrap();
        let b = idx.insert(250.0, 50.0, 2).unwrap();
        assert_eq!(idx.bounds(), Aabb2D::new(0.0, 0.0, 400.0, 100.0));
        assert_eq!(idx.get(b), Some((250.0, 50.0, 2)));
        assert_eq!(
            idx.find_nearest(52.0, 50.0, 5.0).unwrap().map(|h| h.key),
            Some(a)
        );

        idx.update(a, -30.0, -30.0).unwrap();
        assert!(idx.bounds().contains_point(-30.0, -30.0));
        assert_eq!(
            idx.find_nearest(-30.0, -30.0, 0.0).unwrap().map(|h| h.key),
            Some(a)
        );
    }

    #[test]
    fn stale_keys_are_detected() {
        let mut idx: PointIndex<f64, u32> = PointIndex::new(viewport()).unwrap();
        let k = idx.insert(1.0, 1.0, 1).unwrap();
        assert_eq!(idx.remove(k), Some(1));
        assert_eq!(idx.remove(k), None);
        assert_eq!(idx.update(k, 2.0, 2.0), Err(IndexError::StaleKey(k)));

        // The slot is reused with a new generation.
        let k2 = idx.insert(3.0, 3.0, 2).unwrap();
        assert_ne!(k, k2);
        assert_eq!(idx.get(k), None);
        assert_eq!(idx.get(k2), Some((3.0, 3.0, 2)));
    }

    #[test]
    fn remove_all_then_add_all_restarts_slots() {
        let mut idx: PointIndex<f64, u32> = PointIndex::new(viewport()).unwrap();
        let old = idx.add_all([(1.0, 1.0, 1), (2.0, 2.0, 2)]).unwrap();
        idx.remove_all();
        assert!(idx.is_empty());
        assert_eq!(idx.bounds(), viewport());
        assert!(old.iter().all(|&k| idx.get(k).is_none()));

        let new = idx.add_all([(5.0, 5.0, 3), (6.0, 6.0, 4)]).unwrap();
        let payloads: Vec<_> = idx.iter().map(|(_, _, _, p)| p).collect();
        assert_eq!(payloads, vec![3, 4]);
        assert_eq!(idx.iter().next().map(|(k, ..)| k), Some(new[0]));
    }

    #[test]
    fn region_edges_are_inclusive() {
        let idx = PointIndex::build(
            [(10.0, 10.0, 0_u32), (20.0, 15.0, 1), (20.000001, 15.0, 2)],
            viewport(),
        )
        .unwrap();
        let r = Aabb2D::new(10.0, 10.0, 20.0, 20.0);
        let hits: Vec<_> = idx.query_rect(r).unwrap().map(|(_, p)| p).collect();
        assert_eq!(hits, vec![0, 1]);

        // A degenerate rectangle still matches a point sitting exactly on it.
        let line = Aabb2D::new(20.0, 0.0, 20.0, 100.0);
        let hits: Vec<_> = idx.query_rect(line).unwrap().map(|(_, p)| p).collect();
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn set_bounds_applies_policy() {
        let mut idx: PointIndex<f64, u32> = PointIndex::new(viewport()).unwrap();
        idx.insert(700.0, 500.0, 1).unwrap();
        let small = Aabb2D::new(0.0, 0.0, 400.0, 300.0);
        assert!(idx.set_bounds(small).is_err());
        assert_eq!(idx.bounds(), viewport());

        let mut idx: PointIndex<f64, u32> =
            PointIndex::with_config(viewport(), QuadtreeConfig::default(), BoundsPolicy::Clamp)
                .unwrap();
        let k2 = idx.insert(700.0, 500.0, 1).unwrap();
        idx.set_bounds(small).unwrap();
        assert_eq!(idx.get(k2), Some((400.0, 300.0, 1)));
        assert_eq!(
            idx.find_nearest(400.0, 300.0, 0.0).unwrap().map(|h| h.key),
            Some(k2)
        );
    }

    #[test]
    fn flat_backend_matches_quadtree() {
        let pts = [
            (10.0, 10.0, 0_u32),
            (30.0, 40.0, 1),
            (400.0, 300.0, 2),
            (401.0, 300.0, 3),
        ];
        let qt = PointIndex::build(pts, viewport()).unwrap();
        let mut flat = FlatIndex::flat(viewport(), BoundsPolicy::Reject).unwrap();
        flat.add_all(pts).unwrap();

        for (x, y, r) in [(0.0, 0.0, 50.0), (400.5, 300.0, 1.0), (700.0, 10.0, 20.0)] {
            let a = qt.find_nearest(x, y, r).unwrap().map(|h| h.payload);
            let b = flat.find_nearest(x, y, r).unwrap().map(|h| h.payload);
            assert_eq!(a, b);
        }
    }
}
