// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag a circle around, then brush-select a region.
//!
//! The drag uses in-place index updates; the circle keeps its grab offset and is
//! pinned to the container edge when dragged past it. The brush prints the
//! selection as it grows.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example scatter_drag_brush`

use kurbo::{Point, Shape, Size, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use understory_scatter::{Datum, PointFlags, Session, SessionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(7);
    let mut session = Session::new(Size::new(800.0, 600.0), SessionConfig::default())?;
    session.rebuild(
        (0..20)
            .map(|id| {
                Datum::circle_at(
                    id,
                    rng.random_range(0.0..800.0),
                    rng.random_range(0.0..600.0),
                    rng.random_range(2.0..30.0),
                )
            })
            .collect(),
    )?;

    let first = session.points()[0].position;
    let grab = first + Vec2::new(3.0, -2.0);
    let Some(id) = session.drag_start(grab)? else {
        println!("nothing under {grab:?}");
        return Ok(());
    };
    println!("grabbed {id} at {first:?}");
    for step in 1..=10 {
        let pos = grab + Vec2::new(f64::from(step) * 100.0, f64::from(step) * 10.0);
        session.drag_move(pos)?;
        let datum = session.datum(id).ok_or("dragged point vanished")?;
        println!("  pointer {pos:?} -> center {:?}", datum.position);
    }
    session.drag_end();

    session.brush_start(Point::new(100.0, 100.0));
    for corner in [
        Point::new(200.0, 150.0),
        Point::new(400.0, 300.0),
        Point::new(700.0, 500.0),
    ] {
        let selected = session.brush_move(corner)?;
        println!("brush to {corner:?}: {} selected", selected.len());
    }
    if let Some(rect) = session.brush_end() {
        println!("final brush {rect:?}");
    }
    for d in session.points() {
        let flags = session.flags(d.id);
        if flags.contains(PointFlags::SELECTED) {
            let circle = d.circle();
            println!(
                "  {} at ({:.1}, {:.1}), area {:.1}",
                d.id,
                circle.center.x,
                circle.center.y,
                circle.area()
            );
        }
    }
    log::info!("final revision {}", session.revision());
    Ok(())
}
