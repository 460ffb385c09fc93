// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Scatter: hover, drag and brush over a field of circles.
//!
//! A [`Session`] owns a point set, a quadtree over the circle centers
//! (from `understory_quadtree`), and the interaction state a scatter plot needs.
//! Every pointer event is a method call; the session answers with what changed
//! and bumps a [`revision`][Session::revision] counter for the renderer.
//!
//! - [`Session::rebuild`] replaces the point set and builds a fresh index.
//! - [`Session::query`] finds the nearest point within a radius.
//! - [`Session::update_position`] moves one point, updating the index in place.
//! - [`Session::query_region`] lists the ids inside a rectangle, in input order.
//!
//! Picking uses circle centers only; the radius is carried for display.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_scatter::{Datum, PointFlags, PointId, Session, SessionConfig};
//!
//! let mut session = Session::new(Size::new(800.0, 600.0), SessionConfig::default()).unwrap();
//! session
//!     .rebuild(vec![
//!         Datum::circle_at(0, 10.0, 10.0, 5.0),
//!         Datum::circle_at(1, 12.0, 11.0, 8.0),
//!         Datum::circle_at(2, 500.0, 400.0, 3.0),
//!     ])
//!     .unwrap();
//!
//! // Hover picks the closest center within 30 units.
//! let change = session.pointer_move(Point::new(498.0, 401.0)).unwrap();
//! assert_eq!(change.current, Some(PointId(2)));
//! assert_eq!(session.tooltip().unwrap().to_string(), "id: 2, r = 3.00");
//!
//! // Drag it somewhere else.
//! session.drag_start(Point::new(498.0, 401.0)).unwrap();
//! session.drag_move(Point::new(98.0, 101.0)).unwrap();
//! session.drag_end();
//! assert_eq!(session.datum(PointId(2)).unwrap().position, Point::new(100.0, 100.0));
//!
//! // Brush a region.
//! let region = session.query_region(Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();
//! assert_eq!(region, [PointId(0), PointId(1)]);
//! assert!(session.flags(PointId(2)).contains(PointFlags::HOVERED));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod brush;
pub mod drag;

mod datum;
mod error;
mod flags;
mod session;

pub use datum::{Datum, PointId};
pub use error::SessionError;
pub use flags::PointFlags;
pub use session::{HoverChange, Session, SessionConfig, Tooltip};

pub use understory_quadtree::{BoundsPolicy, QuadtreeConfig};
