// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tooltips over a random scatter of circles.
//!
//! Every "tick" replaces the point set (up to 20 circles with radius 2 to 30 in an
//! 800x600 container) and then sweeps a pointer across the container, printing the
//! tooltip whenever the hovered circle changes. Pointer moves are queued and
//! flushed once per frame.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example scatter_hover`

use kurbo::{Point, Size};
use rand::Rng;
use understory_quadtree::{BoundsPolicy, QuadtreeConfig};
use understory_scatter::{Datum, Session, SessionConfig};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const MAX_RADIUS: f64 = 28.0;
const MAX_POINTS: f64 = 20.0;

fn random_circles(rng: &mut impl Rng) -> Vec<Datum> {
    let n = (rng.random::<f64>() * MAX_POINTS) as u32;
    (0..n)
        .map(|id| {
            Datum::circle_at(
                id,
                rng.random::<f64>() * WIDTH,
                rng.random::<f64>() * HEIGHT,
                2.0 + rng.random::<f64>() * MAX_RADIUS,
            )
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut rng = rand::rng();
    // At most 20 points, so use a small leaf capacity to get a tree that actually splits.
    let config = SessionConfig {
        proximity: 30.0,
        bounds_policy: BoundsPolicy::Clamp,
        quadtree: QuadtreeConfig {
            leaf_capacity: 4,
            ..QuadtreeConfig::default()
        },
    };
    let mut session = Session::new(Size::new(WIDTH, HEIGHT), config)?;

    for tick in 0..3 {
        session.rebuild(random_circles(&mut rng))?;
        println!("tick {tick}: {} circles", session.points().len());

        // A diagonal sweep, a few events per frame.
        let steps = 120;
        for i in 0..=steps {
            let t = f64::from(i) / f64::from(steps);
            let pos = Point::new(t * WIDTH, t * HEIGHT);
            session.queue_pointer_move(pos);
            if i % 3 != 0 {
                continue;
            }
            if let Some(change) = session.flush_frame()?
                && change.is_changed()
            {
                match session.tooltip() {
                    Some(tip) => println!("  at ({:.0}, {:.0}) {tip}", pos.x, pos.y),
                    None => println!("  at ({:.0}, {:.0}) nothing", pos.x, pos.y),
                }
            }
        }
        session.pointer_leave();
    }
    log::info!("final revision {}", session.revision());
    Ok(())
}
