//! Integration tests for slice fitting and odometer traversal.
//!
//! These walk whole slices through the public API the way a cell-bounding
//! sweep does: fit a grid, iterate every cell, evaluate a function on each
//! vertex, and cross-check incremental results against direct indexing.

use hyperslice::{
    CubeCursor, Interval, Point, PointCursor, Slice, SliceConfig, Space, D2, D3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ─────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────

fn offset_space(axis_count: usize) -> Space<f64> {
    Space::uniform(
        axis_count,
        Interval::new(-0.45, 0.55),
        Interval::new(0.125, 1.0),
    )
}

fn offset_space_f32(axis_count: usize) -> Space<f32> {
    Space::uniform(
        axis_count,
        Interval::new(-0.45, 0.55),
        Interval::new(0.125, 1.0),
    )
}

/// A box a thousand units out, where a stride is a few hundred ulps wide
/// in `f32`.
fn far_space(axis_count: usize) -> Space<f64> {
    Space::uniform(
        axis_count,
        Interval::new(1000.3, 1001.0),
        Interval::new(0.125, 1.0),
    )
}

fn far_space_f32(axis_count: usize) -> Space<f32> {
    Space::uniform(
        axis_count,
        Interval::new(1000.3, 1001.0),
        Interval::new(0.125, 1.0),
    )
}

// ─────────────────────────────────────────────────────
// Fitting
// ─────────────────────────────────────────────────────

#[test]
fn fitted_resolution_covers_request_across_dimensions() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let requested = rng.gen_range(1..5_000);
        let d2 = Slice::<D2, f64>::new(offset_space(3), requested, SliceConfig::default()).unwrap();
        let d3 = Slice::<D3, f64>::new(offset_space(5), requested, SliceConfig::default()).unwrap();
        assert!(d2.resolution() >= requested);
        assert!(d3.resolution() >= requested);
    }
}

#[test]
fn random_boxes_keep_strides_balanced() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        let axes: Vec<Interval<f64>> = (0..3)
            .map(|_| {
                let lower = rng.gen_range(-5.0..5.0);
                Interval::new(lower, lower + rng.gen_range(0.5..2.0))
            })
            .collect();
        let space = Space::new(axes, Interval::unit());
        let slice = Slice::<D2, f64>::new(space, 4096, SliceConfig::default()).unwrap();
        let strides: Vec<f64> = slice.axes().iter().map(|a| a.stride).collect();
        let max = strides.iter().cloned().fold(f64::MIN, f64::max);
        let min = strides.iter().cloned().fold(f64::MAX, f64::min);
        assert!(max / min <= 2.0 + 1e-9, "strides {strides:?}");
    }
}

// ─────────────────────────────────────────────────────
// Traversal
// ─────────────────────────────────────────────────────

#[test]
fn every_grid_point_locates_to_its_index() {
    let slice = Slice::<D2, f64>::new(offset_space(3), 1000, SliceConfig::default()).unwrap();
    for (index, point) in slice.points().enumerate() {
        assert_eq!(slice.location_at(&point), index);
        assert!(point.is_consistent());
    }
}

#[test]
fn every_grid_point_locates_to_its_index_in_f32() {
    let slice = Slice::<D2, f32>::new(offset_space_f32(3), 1000, SliceConfig::default()).unwrap();
    assert_eq!(slice.points().len(), 1000);
    for (index, point) in slice.points().enumerate() {
        assert_eq!(slice.location_at(&point), index, "walked cell {index}");
        assert_eq!(slice.location_at(&slice.point_at(index).unwrap()), index, "direct cell {index}");
    }
}

#[test]
fn every_grid_point_locates_to_its_index_far_from_origin() {
    let slice = Slice::<D2, f64>::new(far_space(3), 125_000, SliceConfig::default()).unwrap();
    for (index, point) in slice.points().enumerate() {
        assert_eq!(slice.location_at(&point), index);
    }

    let slice = Slice::<D3, f32>::new(far_space_f32(5), 3125, SliceConfig::default()).unwrap();
    for (index, point) in slice.points().enumerate() {
        assert_eq!(slice.location_at(&point), index);
    }
}

#[test]
fn random_points_land_in_their_cube() {
    let slice = Slice::<D2, f64>::new(offset_space(3), 512, SliceConfig::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let slots: Vec<f64> = (0..3)
            .map(|_| rng.gen_range(-0.45..0.549))
            .chain(std::iter::once(0.125))
            .collect();
        let point = Point::<D2, f64>::from_slots(&slots).unwrap();
        let cube = slice.cube_at(slice.location_at(&point)).unwrap();
        assert!(cube.contains(&point, 1e-9), "{point} outside {}", cube.front());
    }
}

#[test]
fn cube_sweep_bounds_the_dependent_coordinate() {
    // Over the whole slice, the smallest per-cell minimum of Re(dependent)
    // must match the smallest value at any grid vertex.
    let slice = Slice::<D2, f64>::new(offset_space(3), 729, SliceConfig::default()).unwrap();
    let mut sweep_min = f64::INFINITY;
    slice.for_each_cube(|_, cube| {
        let (lo, hi) = cube.bounds(|p| p.dependent().re);
        assert!(lo <= hi);
        sweep_min = sweep_min.min(lo);
    });
    let direct_min = slice
        .points()
        .map(|p| p.dependent().re)
        .fold(f64::INFINITY, f64::min);
    assert!(sweep_min <= direct_min + 1e-12);
}

#[test]
fn cube_cursor_matches_direct_cells_with_tight_refresh() {
    let config = SliceConfig::default().with_refresh_interval(1024);
    let slice = Slice::<D3, f64>::new(offset_space(5), 20_000, config).unwrap();
    let mut cursor = CubeCursor::begin(&slice);
    let mut visited = 0;
    while let Some(cube) = cursor.get() {
        if visited % 97 == 0 {
            let expected = slice.cube_at(cursor.index()).unwrap();
            for (a, b) in cube.vertices().iter().zip(expected.vertices()) {
                assert!(a.approx_eq(b, 1e-9));
                assert!((a.dependent() - b.dependent()).norm() < 1e-9);
            }
        }
        visited += 1;
        cursor.increment(&slice);
    }
    assert_eq!(visited, slice.resolution());
}

#[test]
fn forward_and_back_return_to_start() {
    let slice = Slice::<D2, f64>::new(offset_space(3), 50_000, SliceConfig::default()).unwrap();
    let mut cursor = PointCursor::at(&slice, 123).unwrap();
    let start = *cursor.get().unwrap();
    for _ in 0..40_000 {
        cursor.increment(&slice);
    }
    assert_eq!(cursor.index(), 40_123);
    for _ in 0..40_000 {
        cursor.decrement(&slice);
    }
    assert_eq!(cursor.index(), 123);
    let p = cursor.get().unwrap();
    assert!(p.approx_eq(&start, 1e-9));
    assert!((p.dependent() - start.dependent()).norm() < 1e-9);
}

#[test]
fn refit_then_update_keeps_position() {
    let mut slice = Slice::<D2, f64>::new(offset_space(3), 27, SliceConfig::default()).unwrap();
    let mut cursor = PointCursor::at(&slice, 13).unwrap();
    let before = *cursor.get().unwrap();

    // Doubling the sub-resolution of every axis splits each cell in eight.
    slice.set_resolution(216).unwrap();
    cursor.update(&slice);
    let after = *cursor.get().unwrap();
    assert!(after.approx_eq(&before, 1e-9));
    assert_eq!(cursor.digits(), &[2, 2, 2]);
}

#[test]
fn update_after_a_long_walk_keeps_position() {
    let mut slice = Slice::<D2, f64>::new(far_space(3), 1_000_000, SliceConfig::default()).unwrap();
    let mut cursor = PointCursor::begin(&slice);
    for _ in 0..5000 {
        cursor.increment(&slice);
    }
    let walked = *cursor.get().unwrap();

    slice.set_resolution(1_000_000).unwrap();
    cursor.update(&slice);
    assert_eq!(cursor.index(), 5000);
    assert!(cursor.get().unwrap().approx_eq(&walked, 1e-12));

    // Splitting every cell in eight moves the walked point to the doubled digits.
    let digits: Vec<usize> = cursor.digits().iter().map(|d| 2 * d).collect();
    slice.set_resolution(8_000_000).unwrap();
    cursor.update(&slice);
    assert_eq!(cursor.digits(), digits.as_slice());
}

#[test]
fn f32_walk_then_update_keeps_every_index() {
    let mut slice = Slice::<D2, f32>::new(offset_space_f32(3), 1000, SliceConfig::default()).unwrap();
    let mut cursor = CubeCursor::begin(&slice);
    for index in 1..slice.resolution() {
        cursor.increment(&slice);
        slice.set_resolution(1000).unwrap();
        cursor.update(&slice);
        assert_eq!(cursor.index(), index);
    }
}

#[test]
fn point_text_survives_a_walk() {
    let slice = Slice::<D2, f64>::new(offset_space(3), 64, SliceConfig::default()).unwrap();
    let point = slice.points().nth(42).unwrap();
    let parsed: Point<D2, f64> = point.to_string().parse().unwrap();
    assert!(parsed.approx_eq(&point, 1e-12));
    assert!((parsed.dependent() - point.dependent()).norm() < 1e-12);
}
