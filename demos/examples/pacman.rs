// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon `$within` queries over an 8x8 grid of points.
//!
//! This example shows how to combine:
//! - a storage layer (here a `HashMap` of id to point) as the coordinate source,
//! - `SpatialCollection` for the per-collection index and its mutation hooks,
//! - `Shape` descriptors for polygon and box queries.
//!
//! Run:
//! - `cargo run -p locus_demos --example pacman`
//! - `RUST_LOG=locus_grid=debug cargo run -p locus_demos --example pacman`

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use locus_within::{Shape, SpatialCollection, WithinError};

fn main() -> Result<(), WithinError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut store: HashMap<u32, Point> = HashMap::new();
    let mut next_id = 0;
    for x in 1..9 {
        for y in 1..9 {
            store.insert(next_id, Point::new(f64::from(x), f64::from(y)));
            next_id += 1;
        }
    }

    let coll = SpatialCollection::new();
    let indexed = coll.ensure_index(&store)?;
    tracing::info!(points = indexed, "index ready");

    let queries = [
        ("triangle", Shape::polygon([(0.0, 0.0), (1.0, 1.0), (0.0, 2.0)])),
        (
            "bounding square",
            Shape::polygon([(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]),
        ),
        (
            "huge square",
            Shape::Box(Rect::new(-100.0, -100.0, 100.0, 100.0)),
        ),
    ];
    for (name, shape) in &queries {
        let hits = coll.within(shape, &store)?;
        println!("{name}: {} point(s)", hits.len());
    }

    // Pacman: a concave polygon whose mouth opens to the right.
    let pacman = Shape::polygon([
        (0.0, 2.0),
        (0.0, 4.0),
        (2.0, 6.0),
        (4.0, 6.0),
        (6.0, 4.0),
        (4.0, 3.0),
        (6.0, 2.0),
        (4.0, 0.0),
        (2.0, 0.0),
    ]);

    let mut small: HashMap<u32, Point> = HashMap::new();
    small.insert(0, Point::new(1.0, 3.0));
    let pac = SpatialCollection::new();
    pac.ensure_index(&small)?;
    println!("pacman, body only: {:?}", pac.within(&pacman, &small)?);

    // Inside the bounding box but in the mouth, so it must not match.
    small.insert(1, Point::new(5.0, 3.0));
    pac.on_insert(1, Point::new(5.0, 3.0))?;
    println!("pacman, body and mouth: {:?}", pac.within(&pacman, &small)?);

    match coll.within(&Shape::polygon([(0.0, 0.0), (1.0, 1.0)]), &store) {
        Ok(hits) => println!("two vertices: {hits:?}"),
        Err(e) => println!("two vertices: {e}"),
    }

    Ok(())
}
