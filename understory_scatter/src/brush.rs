// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle brush state: an anchor corner plus the current pointer.

use kurbo::{Point, Rect};

/// Tracks a rubber-band rectangle between press and release.
#[derive(Debug, Clone, Default, Copy)]
pub struct BrushState {
    anchor: Option<Point>,
    current: Option<Point>,
}

impl BrushState {
    /// Start a brush at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.anchor = Some(pos);
        self.current = Some(pos);
    }

    /// Move the free corner, returning the normalized brush rectangle.
    pub fn update(&mut self, pos: Point) -> Option<Rect> {
        self.anchor?;
        self.current = Some(pos);
        self.rect()
    }

    /// The normalized brush rectangle, if brushing.
    pub fn rect(&self) -> Option<Rect> {
        Some(Rect::from_points(self.anchor?, self.current?))
    }

    /// Finish brushing, returning the final rectangle.
    pub fn end(&mut self) -> Option<Rect> {
        let rect = self.rect();
        *self = Self::default();
        rect
    }

    /// Returns `true` between [`start`][Self::start] and [`end`][Self::end].
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }
}
