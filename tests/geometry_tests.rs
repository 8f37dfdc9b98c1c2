#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use geo::{Coord, Line};
use roadevo::simulation::geometric_utils::{
    Point, polygon_intersects_segment, polygons_intersect, segment_intersection,
};

fn pt(x: f32, y: f32) -> Point {
    Coord { x, y }
}

fn square(cx: f32, cy: f32, half: f32) -> [Point; 4] {
    [
        pt(cx - half, cy - half),
        pt(cx + half, cy - half),
        pt(cx + half, cy + half),
        pt(cx - half, cy + half),
    ]
}

#[test]
fn test_crossing_diagonals() {
    let hit = segment_intersection(pt(0.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0), pt(10.0, 0.0))
        .expect("diagonals cross");
    assert_eq!(hit.point, pt(5.0, 5.0));
    assert_eq!(hit.offset, 0.5);
}

#[test]
fn test_parallel_segments_do_not_intersect() {
    assert!(
        segment_intersection(pt(0.0, 0.0), pt(10.0, 0.0), pt(0.0, 5.0), pt(10.0, 5.0)).is_none()
    );
}

#[test]
fn test_collinear_segments_do_not_intersect() {
    assert!(
        segment_intersection(pt(0.0, 0.0), pt(10.0, 0.0), pt(5.0, 0.0), pt(15.0, 0.0)).is_none()
    );
}

#[test]
fn test_crossing_beyond_segment_end() {
    // The infinite lines cross at (20, 0), past the end of the first segment.
    assert!(
        segment_intersection(pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, -5.0), pt(20.0, 5.0)).is_none()
    );
}

#[test]
fn test_touching_endpoint_counts() {
    let hit = segment_intersection(pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, -5.0), pt(10.0, 5.0))
        .expect("endpoint touch");
    assert_eq!(hit.offset, 1.0);
    assert_eq!(hit.point, pt(10.0, 0.0));
}

#[test]
fn test_offset_is_measured_along_first_segment() {
    let hit = segment_intersection(pt(0.0, 0.0), pt(0.0, -100.0), pt(-5.0, -25.0), pt(5.0, -25.0))
        .expect("ray crosses wall");
    assert!((hit.offset - 0.25).abs() < 1e-6);
}

#[test]
fn test_overlapping_polygons() {
    let p = square(0.0, 0.0, 10.0);
    let q = square(5.0, 5.0, 10.0);
    assert!(polygons_intersect(&p, &q));
}

#[test]
fn test_disjoint_polygons() {
    let p = square(0.0, 0.0, 10.0);
    let q = square(50.0, 0.0, 10.0);
    assert!(!polygons_intersect(&p, &q));
}

#[test]
fn test_contained_polygon_is_not_an_edge_crossing() {
    let outer = square(0.0, 0.0, 20.0);
    let inner = square(0.0, 0.0, 5.0);
    assert!(!polygons_intersect(&outer, &inner));
}

#[test]
fn test_polygon_intersection_is_symmetric() {
    let shapes = [
        square(0.0, 0.0, 10.0),
        square(5.0, 5.0, 10.0),
        square(50.0, 0.0, 10.0),
        square(0.0, 0.0, 3.0),
        square(12.0, 0.0, 3.0),
    ];
    for p in &shapes {
        for q in &shapes {
            assert_eq!(polygons_intersect(p, q), polygons_intersect(q, p));
        }
    }
}

#[test]
fn test_degenerate_two_point_polygon_matches_segment_test() {
    let p = square(0.0, 0.0, 10.0);
    let wall = [pt(5.0, -100.0), pt(5.0, 100.0)];
    let segment = Line::new(wall[0], wall[1]);
    assert!(polygons_intersect(&p, &wall));
    assert!(polygon_intersects_segment(&p, &segment));

    let far = Line::new(pt(30.0, -100.0), pt(30.0, 100.0));
    assert!(!polygon_intersects_segment(&p, &far));
}
