// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locus Within: polygon containment queries over an indexed point collection.
//!
//! This crate ties the Locus building blocks together:
//!
//! 1. a query [`Shape`] (a polygon or a rectangle) is validated into a
//!    [`locus_geometry::Polygon`],
//! 2. its bounding box is handed to a [`locus_grid::CandidateSource`]
//!    (normally a [`locus_grid::GeoIndex`]) for candidates,
//! 3. each candidate's coordinates are read from a [`PointSource`] and tested
//!    exactly, boundary included.
//!
//! The index never changes a result, it only prunes candidates. Results are
//! unordered.
//!
//! [`SpatialCollection`] owns the index of one collection behind a
//! reader-writer lock and exposes the lifecycle and maintenance hooks a
//! storage layer calls: [`ensure_index`](SpatialCollection::ensure_index),
//! [`on_insert`](SpatialCollection::on_insert),
//! [`on_remove`](SpatialCollection::on_remove),
//! [`on_update`](SpatialCollection::on_update).
//!
//! # Example
//!
//! ```rust
//! use hashbrown::HashMap;
//! use kurbo::Point;
//! use locus_within::{Shape, SpatialCollection};
//!
//! let mut store: HashMap<u32, Point> = HashMap::new();
//! store.insert(0, Point::new(1.0, 3.0));
//!
//! let coll = SpatialCollection::new();
//! coll.ensure_index(&store)?;
//!
//! let pacman = Shape::polygon([
//!     (0.0, 2.0), (0.0, 4.0), (2.0, 6.0), (4.0, 6.0),
//!     (6.0, 4.0), (4.0, 3.0), (6.0, 2.0),
//!     (4.0, 0.0), (2.0, 0.0),
//! ]);
//! assert_eq!(coll.within(&pacman, &store)?, [0]);
//!
//! // In the mouth: inside the bounding box, outside the polygon.
//! store.insert(1, Point::new(5.0, 3.0));
//! coll.on_insert(1, Point::new(5.0, 3.0))?;
//! assert_eq!(coll.within(&pacman, &store)?, [0]);
//! # Ok::<(), locus_within::WithinError>(())
//! ```
//!
//! ## Logging
//!
//! Index builds and scan plans are reported as `tracing` events at `debug`
//! level, per-query counts at `trace` level. No subscriber is installed.

mod collection;
mod error;
mod executor;
mod shape;
mod source;

pub use collection::SpatialCollection;
pub use error::WithinError;
pub use executor::{WithinQuery, within_polygon};
pub use shape::Shape;
pub use source::PointSource;

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashMap;
    use kurbo::{Point, Rect};
    use locus_geometry::{GeometryError, Polygon, contains_inclusive, point_in_polygon};
    use locus_grid::{FlatScan, GeoIndex, GridConfig};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// A minimal storage layer: records plus the collection's hooks.
    struct Store {
        points: HashMap<u32, Point>,
        coll: SpatialCollection<u32>,
        next_id: u32,
    }

    impl Store {
        fn new() -> Self {
            Self {
                points: HashMap::new(),
                coll: SpatialCollection::new(),
                next_id: 0,
            }
        }

        fn save(&mut self, x: f64, y: f64) -> u32 {
            let id = self.next_id;
            self.next_id += 1;
            let pt = Point::new(x, y);
            self.points.insert(id, pt);
            self.coll.on_insert(id, pt).unwrap();
            id
        }

        fn ensure_index(&self) {
            self.coll.ensure_index(&self.points).unwrap();
        }

        fn find(&self, shape: &Shape) -> Result<Vec<u32>, WithinError> {
            self.coll.within(shape, &self.points).map(|mut v| {
                v.sort_unstable();
                v
            })
        }
    }

    fn grid_8x8() -> Store {
        let mut store = Store::new();
        for x in 1..9 {
            for y in 1..9 {
                store.save(f64::from(x), f64::from(y));
            }
        }
        store.ensure_index();
        store
    }

    fn pacman() -> Shape {
        Shape::polygon([
            (0.0, 2.0),
            (0.0, 4.0),
            (2.0, 6.0),
            (4.0, 6.0), // head
            (6.0, 4.0),
            (4.0, 3.0),
            (6.0, 2.0), // mouth
            (4.0, 0.0),
            (2.0, 0.0), // bottom
        ])
    }

    #[test]
    fn triangle_selects_a_single_corner_point() {
        let store = grid_8x8();
        let hits = store
            .find(&Shape::polygon([(0.0, 0.0), (1.0, 1.0), (0.0, 2.0)]))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(store.points[&hits[0]], Point::new(1.0, 1.0));
    }

    #[test]
    fn bounding_box_selects_everything() {
        let store = grid_8x8();
        let square = Shape::polygon([(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        assert_eq!(store.find(&square).unwrap().len(), 64);
    }

    #[test]
    fn huge_bounding_box_selects_everything() {
        let store = grid_8x8();
        let square = Shape::polygon([
            (-100.0, -100.0),
            (-100.0, 100.0),
            (100.0, 100.0),
            (100.0, -100.0),
        ]);
        assert_eq!(store.find(&square).unwrap().len(), 64);
    }

    #[test]
    fn exact_extent_includes_boundary_points() {
        let store = grid_8x8();
        let extent = Shape::polygon([(1.0, 1.0), (1.0, 8.0), (8.0, 8.0), (8.0, 1.0)]);
        assert_eq!(store.find(&extent).unwrap().len(), 64);
        let boxed = Shape::Box(Rect::new(1.0, 1.0, 8.0, 8.0));
        assert_eq!(store.find(&boxed).unwrap().len(), 64);
    }

    #[test]
    fn pacman_excludes_its_mouth() {
        let mut store = Store::new();
        store.save(1.0, 3.0);
        store.ensure_index();
        assert_eq!(store.find(&pacman()).unwrap().len(), 1);

        store.save(5.0, 3.0); // in the mouth opening
        store.save(3.0, 7.0); // above the head
        store.save(3.0, -1.0); // below the bottom
        assert_eq!(store.find(&pacman()), Ok(vec![0]));
    }

    #[test]
    fn two_vertices_is_an_invalid_shape() {
        let store = grid_8x8();
        assert!(matches!(
            store.find(&Shape::polygon([(0.0, 0.0), (1.0, 1.0)])),
            Err(WithinError::Geometry(GeometryError::InvalidShape(_)))
        ));
        assert!(matches!(
            store.find(&Shape::polygon([(0.0, 0.0), (1.0, f64::NAN), (2.0, 0.0)])),
            Err(WithinError::Geometry(GeometryError::InvalidCoordinate { .. }))
        ));
    }

    #[test]
    fn empty_results_are_not_errors() {
        let store = grid_8x8();
        let far = Shape::Box(Rect::new(50.0, 50.0, 60.0, 60.0));
        assert_eq!(store.find(&far), Ok(vec![]));
        let outside_domain = Shape::Box(Rect::new(500.0, 500.0, 600.0, 600.0));
        assert_eq!(store.find(&outside_domain), Ok(vec![]));

        let empty = Store::new();
        empty.ensure_index();
        assert_eq!(empty.find(&pacman()), Ok(vec![]));
    }

    #[test]
    fn vertex_and_mid_edge_points_are_included() {
        let mut store = Store::new();
        let vertex = store.save(4.0, 6.0);
        let mid_edge = store.save(3.0, 6.0);
        let notch_tip = store.save(4.0, 3.0);
        let slanted_mid_edge = store.save(1.0, 5.0);
        store.ensure_index();
        assert_eq!(
            store.find(&pacman()),
            Ok(vec![vertex, mid_edge, notch_tip, slanted_mid_edge])
        );
    }

    #[test]
    fn points_within_tolerance_of_extreme_edges_match_the_predicate() {
        let square = Polygon::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        let pts: Vec<(u32, Point)> = [
            (10.0 + 1e-12, 5.0),
            (-1e-12, 5.0),
            (5.0, 10.0 + 1e-12),
            (5.0, -1e-12),
            (10.0 + 1e-12, 10.0 + 1e-12),
            (10.0 + 1e-6, 5.0),
            (5.0, -1e-6),
        ]
        .into_iter()
        .zip(0..)
        .map(|((x, y), id)| (id, Point::new(x, y)))
        .collect();
        let idx = GeoIndex::build(GridConfig::default(), pts.iter().copied()).unwrap();
        let flat: FlatScan<u32> = pts.iter().copied().collect();
        let shape = Shape::from(square.clone());

        let direct: Vec<u32> = pts
            .iter()
            .filter(|&&(_, p)| point_in_polygon(p, &square).unwrap())
            .map(|&(id, _)| id)
            .collect();
        assert_eq!(direct, [0, 1, 2, 3, 4]);

        let mut indexed = within_polygon(&shape, &idx, &idx).unwrap();
        let mut scanned = within_polygon(&shape, &flat, &pts[..]).unwrap();
        indexed.sort_unstable();
        scanned.sort_unstable();
        assert_eq!(indexed, direct);
        assert_eq!(scanned, direct);

        let unindexed = SpatialCollection::new()
            .within(&shape, &pts[..])
            .map(|mut v| {
                v.sort_unstable();
                v
            })
            .unwrap();
        assert_eq!(unindexed, direct);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let store = grid_8x8();
        let first = store.find(&pacman()).unwrap();
        let second = store.find(&pacman()).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn rectangle_shape_matches_a_dedicated_rectangle_test() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut store = Store::new();
        for _ in 0..400 {
            let x = f64::from(rng.gen_range(-40_i32..=40)) / 4.0;
            let y = f64::from(rng.gen_range(-40_i32..=40)) / 4.0;
            store.save(x, y);
        }
        store.ensure_index();
        for _ in 0..30 {
            let x0 = f64::from(rng.gen_range(-48_i32..=48)) / 4.0;
            let y0 = f64::from(rng.gen_range(-48_i32..=48)) / 4.0;
            let rect = Rect::new(x0, y0, x0 + rng.gen_range(0.0..8.0), y0 + rng.gen_range(0.0..8.0));
            let mut expected: Vec<u32> = store
                .points
                .iter()
                .filter(|&(_, &p)| contains_inclusive(&rect, p))
                .map(|(&id, _)| id)
                .collect();
            expected.sort_unstable();
            assert_eq!(store.find(&Shape::Box(rect)).unwrap(), expected);
            let as_polygon = Shape::from(Polygon::from_rect(rect).unwrap());
            assert_eq!(store.find(&as_polygon).unwrap(), expected);
        }
    }

    fn random_convex_polygon(rng: &mut StdRng) -> Polygon {
        // Vertices on a circle at increasing angles form a convex polygon.
        let n = rng.gen_range(3..10);
        let cx = rng.gen_range(-30.0..30.0);
        let cy = rng.gen_range(-30.0..30.0);
        let r = rng.gen_range(1.0..40.0);
        let mut angles: Vec<f64> = (0..n)
            .map(|_| rng.gen_range(0.0..core::f64::consts::TAU))
            .collect();
        angles.sort_by(f64::total_cmp);
        Polygon::new(angles.iter().map(|a| (cx + r * a.cos(), cy + r * a.sin()))).unwrap()
    }

    #[test]
    fn index_never_changes_results_for_convex_polygons() {
        let mut rng = StdRng::seed_from_u64(2024);
        let pts: Vec<(u32, Point)> = (0..1_000)
            .map(|i| (i, Point::new(rng.gen_range(-60.0..60.0), rng.gen_range(-60.0..60.0))))
            .collect();
        let idx = GeoIndex::build(GridConfig::default(), pts.iter().copied()).unwrap();
        let flat: FlatScan<u32> = pts.iter().copied().collect();

        for _ in 0..40 {
            let poly = random_convex_polygon(&mut rng);
            let shape = Shape::from(poly.clone());
            let mut indexed = within_polygon(&shape, &idx, &pts[..]).unwrap();
            let mut direct: Vec<u32> = pts
                .iter()
                .filter(|&&(_, p)| point_in_polygon(p, &poly).unwrap())
                .map(|&(id, _)| id)
                .collect();
            let mut scanned = within_polygon(&shape, &flat, &pts[..]).unwrap();
            indexed.sort_unstable();
            direct.sort_unstable();
            scanned.sort_unstable();
            assert_eq!(indexed, direct);
            assert_eq!(scanned, direct);
        }
    }

    #[test]
    fn enlarging_the_polygon_never_loses_points() {
        let store = grid_8x8();
        let mut previous = 0;
        for half in [0.5, 1.0, 2.5, 3.0, 3.5, 10.0, 150.0] {
            let diamond = Shape::polygon([
                (4.5, 4.5 - half),
                (4.5 + half, 4.5),
                (4.5, 4.5 + half),
                (4.5 - half, 4.5),
            ]);
            let count = store.find(&diamond).unwrap().len();
            assert!(count >= previous, "{count} < {previous} at {half}");
            previous = count;
        }
        assert_eq!(previous, 64);
    }

    #[test]
    fn queries_observe_completed_mutations() {
        let mut store = grid_8x8();
        let shape = Shape::Box(Rect::new(20.0, 20.0, 30.0, 30.0));
        assert_eq!(store.find(&shape), Ok(vec![]));
        let id = store.save(25.0, 25.0);
        assert_eq!(store.find(&shape), Ok(vec![id]));
        store.points.remove(&id);
        store.coll.on_remove(&id).unwrap();
        assert_eq!(store.find(&shape), Ok(vec![]));
    }
}
