// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-point presentation state.

bitflags::bitflags! {
    /// Interaction state of one point, for the presentation layer to style.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PointFlags: u8 {
        /// Closest point to the pointer within the pick radius.
        const HOVERED  = 0b0000_0001;
        /// Inside the current brush selection.
        const SELECTED = 0b0000_0010;
        /// Being dragged.
        const DRAGGED  = 0b0000_0100;
    }
}

impl Default for PointFlags {
    fn default() -> Self {
        Self::empty()
    }
}
