// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag state helper: track the grabbed point and where it should move.
//!
//! ## Usage
//!
//! 1) Start a drag with [`DragState::start`], passing the grabbed point's id, the
//!    pointer position, and the point's current center.
//! 2) On each move event, call [`DragState::target_position`] to get the new center,
//!    then [`DragState::update`] to advance the pointer.
//! 3) End the drag with [`DragState::end`].
//!
//! The grab offset keeps the circle from jumping so its center is under the pointer:
//! the point moves by exactly as much as the pointer does.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_scatter::PointId;
//! use understory_scatter::drag::DragState;
//!
//! let mut drag = DragState::default();
//!
//! // Grab a circle centered at (100, 100) by clicking at (104, 97).
//! drag.start(PointId(3), Point::new(104.0, 97.0), Point::new(100.0, 100.0));
//! assert!(drag.is_dragging());
//!
//! // Move the pointer by (10, 20): the center follows by the same amount.
//! let pos = Point::new(114.0, 117.0);
//! assert_eq!(drag.target_position(pos), Some(Point::new(110.0, 120.0)));
//! drag.update(pos);
//!
//! assert_eq!(drag.end(), Some(PointId(3)));
//! ```

use kurbo::{Point, Vec2};

use crate::datum::PointId;

/// Tracks drag state for move event processing
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    /// Start position of the drag operation
    pub start_pos: Option<Point>,
    /// Last recorded pointer position during drag
    pub last_pos: Option<Point>,
    /// Point being dragged
    pub target: Option<PointId>,
    /// Offset from the pointer to the grabbed point's center
    pub grab_offset: Vec2,
}

impl DragState {
    /// Start dragging `target`, whose center is at `anchor`, from pointer position `pos`.
    pub fn start(&mut self, target: PointId, pos: Point, anchor: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.target = Some(target);
        self.grab_offset = anchor - pos;
    }

    /// Update the drag state with a new position, returning the movement delta since last update.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    /// Where the grabbed point's center belongs for pointer position `pos`.
    pub fn target_position(&self, pos: Point) -> Option<Point> {
        self.start_pos.map(|_| pos + self.grab_offset)
    }

    /// End the current drag operation and reset state, returning the dragged point.
    pub fn end(&mut self) -> Option<PointId> {
        let target = self.target.take();
        *self = Self::default();
        target
    }

    /// Returns `true` while a drag operation is active
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}
