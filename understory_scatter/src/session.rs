// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scatter session: point set, index, and interaction state.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};
use understory_quadtree::{Aabb2D, BoundsPolicy, Key, PointIndex, QuadtreeConfig};

use crate::brush::BrushState;
use crate::datum::{Datum, PointId};
use crate::drag::DragState;
use crate::error::SessionError;
use crate::flags::PointFlags;

/// Session tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Pick radius for hover and drag, in container units.
    pub proximity: f64,
    /// What happens to points placed outside the viewport.
    pub bounds_policy: BoundsPolicy,
    /// Index tuning.
    pub quadtree: QuadtreeConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            proximity: 30.0,
            bounds_policy: BoundsPolicy::Clamp,
            quadtree: QuadtreeConfig::default(),
        }
    }
}

/// Hover transition produced by a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HoverChange {
    /// Hovered point before the event.
    pub previous: Option<PointId>,
    /// Hovered point after the event.
    pub current: Option<PointId>,
}

impl HoverChange {
    /// Returns `true` if the hovered point changed.
    pub fn is_changed(&self) -> bool {
        self.previous != self.current
    }
}

/// What to show next to the hovered point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Hovered point.
    pub id: PointId,
    /// Its display radius.
    pub radius: f64,
    /// Its center, for positioning the label.
    pub anchor: Point,
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id: {}, r = {:.2}", self.id, self.radius)
    }
}

/// Owns a point set, its spatial index, and hover/drag/brush state.
///
/// Payloads in the index are slots into the datum list, so region results
/// sorted by slot come out in input order.
#[derive(Debug)]
pub struct Session<D = ()> {
    config: SessionConfig,
    viewport: Size,
    points: Vec<Datum<D>>,
    slots: HashMap<PointId, usize>,
    keys: Vec<Key>,
    index: PointIndex<f64, usize>,
    hovered: Option<PointId>,
    selection: Vec<PointId>,
    drag: DragState,
    brush: BrushState,
    pending_move: Option<Point>,
    revision: u64,
}

fn viewport_bounds(size: Size) -> Result<Aabb2D<f64>, SessionError> {
    if !(size.width.is_finite() && size.height.is_finite())
        || size.width <= 0.0
        || size.height <= 0.0
    {
        return Err(SessionError::InvalidViewport(size));
    }
    Ok(Aabb2D::new(0.0, 0.0, size.width, size.height))
}

impl<D> Session<D> {
    /// Create an empty session for a container of the given size.
    pub fn new(viewport: Size, config: SessionConfig) -> Result<Self, SessionError> {
        let bounds = viewport_bounds(viewport)?;
        let index = PointIndex::with_config(bounds, config.quadtree, config.bounds_policy)?;
        Ok(Self {
            config,
            viewport,
            points: Vec::new(),
            slots: HashMap::new(),
            keys: Vec::new(),
            index,
            hovered: None,
            selection: Vec::new(),
            drag: DragState::default(),
            brush: BrushState::default(),
            pending_move: None,
            revision: 0,
        })
    }

    /// Session tuning.
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Container size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Current points in input order.
    pub fn points(&self) -> &[Datum<D>] {
        &self.points
    }

    /// Look up a point by id.
    pub fn datum(&self, id: PointId) -> Option<&Datum<D>> {
        self.slots.get(&id).map(|&slot| &self.points[slot])
    }

    /// Bumped whenever something a renderer would draw has changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn slot_of(&self, id: PointId) -> Result<usize, SessionError> {
        self.slots
            .get(&id)
            .copied()
            .ok_or(SessionError::UnknownId(id))
    }

    /// Copy stored (possibly clamped) index coordinates back onto the data.
    fn sync_positions(&mut self) {
        for (datum, &key) in self.points.iter_mut().zip(&self.keys) {
            if let Some((x, y, _)) = self.index.get(key) {
                datum.position = Point::new(x, y);
            }
        }
    }

    /// Replace the point set and build a fresh index over it.
    ///
    /// On error the session is left unchanged. Hover, selection and drag
    /// state referring to ids that are gone is dropped.
    pub fn rebuild(&mut self, points: Vec<Datum<D>>) -> Result<(), SessionError> {
        let mut slots = HashMap::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            if slots.insert(p.id, i).is_some() {
                return Err(SessionError::DuplicateId(p.id));
            }
        }
        let bounds = viewport_bounds(self.viewport)?;
        let mut index =
            PointIndex::with_config(bounds, self.config.quadtree, self.config.bounds_policy)?;
        index.reserve(points.len());
        let keys = index.add_all(
            points
                .iter()
                .enumerate()
                .map(|(i, p)| (p.position.x, p.position.y, i)),
        )?;

        self.points = points;
        self.slots = slots;
        self.keys = keys;
        self.index = index;
        self.sync_positions();

        if self.hovered.is_some_and(|id| !self.slots.contains_key(&id)) {
            self.hovered = None;
        }
        let slots = &self.slots;
        self.selection.retain(|id| slots.contains_key(id));
        self.selection.sort_by_key(|id| slots[id]);
        if self.drag.target.is_some_and(|id| !slots.contains_key(&id)) {
            self.drag.end();
        }
        self.bump();
        log::debug!("rebuilt scatter index over {} points", self.points.len());
        Ok(())
    }

    /// Closest point to `(x, y)` within `radius`, inclusive.
    ///
    /// Equidistant candidates resolve to the one earliest in input order.
    /// Coordinates outside the container (including negative ones) are
    /// rejected with [`IndexError::OutOfBounds`][understory_quadtree::IndexError::OutOfBounds].
    pub fn query(&self, x: f64, y: f64, radius: f64) -> Result<Option<&Datum<D>>, SessionError> {
        let hit = self.index.find_nearest(x, y, radius)?;
        Ok(hit.map(|h| &self.points[h.payload]))
    }

    /// Move one point. The index is updated in place.
    ///
    /// Under [`BoundsPolicy::Clamp`] the datum ends up at the clamped position.
    pub fn update_position(&mut self, id: PointId, x: f64, y: f64) -> Result<(), SessionError> {
        let slot = self.slot_of(id)?;
        let key = self.keys[slot];
        self.index.update(key, x, y)?;
        if let Some((sx, sy, _)) = self.index.get(key) {
            if (sx, sy) != (x, y) {
                log::trace!("point {id} clamped from ({x}, {y}) to ({sx}, {sy})");
            }
            self.points[slot].position = Point::new(sx, sy);
        }
        self.bump();
        Ok(())
    }

    /// Ids of points inside `rect`, edges inclusive, in input order.
    ///
    /// The rectangle may be given with its corners in any order.
    pub fn query_region(&self, rect: Rect) -> Result<Vec<PointId>, SessionError> {
        let r = rect.abs();
        let aabb = Aabb2D::new(r.x0, r.y0, r.x1, r.y1);
        Ok(self
            .index
            .query_rect(aabb)?
            .map(|(_, slot)| self.points[slot].id)
            .collect())
    }

    fn set_hovered(&mut self, current: Option<PointId>) -> HoverChange {
        let change = HoverChange {
            previous: self.hovered,
            current,
        };
        if change.is_changed() {
            self.hovered = current;
            self.bump();
            log::trace!("hover {:?} -> {:?}", change.previous, change.current);
        }
        change
    }

    // A pointer outside the container picks nothing.
    fn pick(&self, pos: Point) -> Result<Option<usize>, SessionError> {
        if pos.is_finite() && !self.index.bounds().contains_point(pos.x, pos.y) {
            return Ok(None);
        }
        let hit = self
            .index
            .find_nearest(pos.x, pos.y, self.config.proximity)?;
        Ok(hit.map(|h| h.payload))
    }

    /// Re-pick the hovered point for a pointer at `pos`.
    ///
    /// A pointer outside the container clears the hover.
    pub fn pointer_move(&mut self, pos: Point) -> Result<HoverChange, SessionError> {
        let current = self.pick(pos)?.map(|slot| self.points[slot].id);
        Ok(self.set_hovered(current))
    }

    /// The pointer left the container.
    pub fn pointer_leave(&mut self) -> HoverChange {
        self.pending_move = None;
        self.set_hovered(None)
    }

    /// Currently hovered point.
    pub fn hovered(&self) -> Option<PointId> {
        self.hovered
    }

    /// Label for the hovered point.
    pub fn tooltip(&self) -> Option<Tooltip> {
        let datum = self.datum(self.hovered?)?;
        Some(Tooltip {
            id: datum.id,
            radius: datum.radius,
            anchor: datum.position,
        })
    }

    /// Grab the point nearest to `pos` within the pick radius.
    ///
    /// Returns `Ok(None)` if nothing is close enough.
    pub fn drag_start(&mut self, pos: Point) -> Result<Option<PointId>, SessionError> {
        let Some(slot) = self.pick(pos)? else {
            return Ok(None);
        };
        let datum = &self.points[slot];
        let id = datum.id;
        self.drag.start(id, pos, datum.position);
        self.set_hovered(Some(id));
        self.bump();
        log::debug!("drag start on point {id}");
        Ok(Some(id))
    }

    /// Move the grabbed point so it keeps its offset from the pointer.
    ///
    /// Returns the dragged id, or `Ok(None)` when no drag is active.
    pub fn drag_move(&mut self, pos: Point) -> Result<Option<PointId>, SessionError> {
        let (Some(id), Some(target)) = (self.drag.target, self.drag.target_position(pos)) else {
            return Ok(None);
        };
        self.update_position(id, target.x, target.y)?;
        self.drag.update(pos);
        self.set_hovered(Some(id));
        Ok(Some(id))
    }

    /// Release the grabbed point.
    pub fn drag_end(&mut self) -> Option<PointId> {
        let id = self.drag.end()?;
        self.bump();
        log::debug!("drag end on point {id}");
        Some(id)
    }

    /// Point currently being dragged.
    pub fn dragged(&self) -> Option<PointId> {
        self.drag.target
    }

    /// Begin a brush at `pos`, clearing the previous selection.
    pub fn brush_start(&mut self, pos: Point) {
        self.brush.start(pos);
        self.clear_selection();
        self.bump();
    }

    /// Extend the brush to `pos`; the selection becomes the points under it.
    ///
    /// Without an active brush the selection is returned unchanged.
    pub fn brush_move(&mut self, pos: Point) -> Result<&[PointId], SessionError> {
        if let Some(rect) = self.brush.update(pos) {
            self.selection = self.query_region(rect)?;
            self.bump();
        }
        Ok(&self.selection)
    }

    /// Finish brushing. The selection is kept.
    pub fn brush_end(&mut self) -> Option<Rect> {
        let rect = self.brush.end()?;
        self.bump();
        log::debug!("brush selected {} points", self.selection.len());
        Some(rect)
    }

    /// Returns `true` between [`brush_start`][Self::brush_start] and
    /// [`brush_end`][Self::brush_end].
    pub fn is_brushing(&self) -> bool {
        self.brush.is_active()
    }

    /// Current brush rectangle, if brushing.
    pub fn brush_rect(&self) -> Option<Rect> {
        self.brush.rect()
    }

    /// Selected ids in input order.
    pub fn selection(&self) -> &[PointId] {
        &self.selection
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.bump();
        }
    }

    /// Record a pointer position to be processed at the next [`flush_frame`][Self::flush_frame].
    ///
    /// Only the latest queued position is kept.
    pub fn queue_pointer_move(&mut self, pos: Point) {
        self.pending_move = Some(pos);
    }

    /// Process the queued pointer position, if any.
    ///
    /// While dragging this moves the grabbed point; otherwise it updates hover.
    /// Brush moves are not coalesced.
    pub fn flush_frame(&mut self) -> Result<Option<HoverChange>, SessionError> {
        let Some(pos) = self.pending_move.take() else {
            return Ok(None);
        };
        if self.drag.is_dragging() {
            let previous = self.hovered;
            self.drag_move(pos)?;
            Ok(Some(HoverChange {
                previous,
                current: self.hovered,
            }))
        } else {
            self.pointer_move(pos).map(Some)
        }
    }

    /// Resize the container. Index bounds become `(0, 0)`–`(w, h)` and the
    /// bounds policy is re-applied to every point.
    pub fn resize(&mut self, size: Size) -> Result<(), SessionError> {
        let bounds = viewport_bounds(size)?;
        self.index.set_bounds(bounds)?;
        self.viewport = size;
        self.sync_positions();
        self.bump();
        log::debug!("resized to {}x{}", size.width, size.height);
        Ok(())
    }

    /// Interaction state of one point.
    pub fn flags(&self, id: PointId) -> PointFlags {
        let mut flags = PointFlags::empty();
        flags.set(PointFlags::HOVERED, self.hovered == Some(id));
        flags.set(PointFlags::DRAGGED, self.drag.target == Some(id));
        flags.set(PointFlags::SELECTED, self.selection.contains(&id));
        flags
    }
}
