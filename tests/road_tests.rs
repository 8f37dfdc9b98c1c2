#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use roadevo::simulation::error::SimulationError;
use roadevo::simulation::road::Road;

#[test]
fn test_road_bounds() {
    let road = Road::new(100.0, 180.0, 3).unwrap();
    assert_eq!(road.left, 10.0);
    assert_eq!(road.right, 190.0);
    assert_eq!(road.lane_width(), 60.0);
}

#[test]
fn test_lane_centers() {
    let road = Road::new(100.0, 180.0, 3).unwrap();
    assert_eq!(road.lane_center(0), 40.0);
    assert_eq!(road.lane_center(1), 100.0);
    assert_eq!(road.lane_center(2), 160.0);
}

#[test]
fn test_out_of_range_lane_is_clamped() {
    let road = Road::new(100.0, 180.0, 3).unwrap();
    assert_eq!(road.lane_center(7), road.lane_center(2));
    assert_eq!(road.lane_center(-4), road.lane_center(0));
}

#[test]
fn test_borders_are_vertical_and_long() {
    let road = Road::new(100.0, 180.0, 3).unwrap();
    let borders = road.borders();
    assert_eq!(borders.len(), 2);

    assert_eq!(borders[0].start.x, road.left);
    assert_eq!(borders[0].end.x, road.left);
    assert_eq!(borders[1].start.x, road.right);
    assert_eq!(borders[1].end.x, road.right);

    for border in borders {
        assert!(border.start.y < -100_000.0);
        assert!(border.end.y > 100_000.0);
    }
}

#[test]
fn test_lane_dividers() {
    let road = Road::new(100.0, 180.0, 3).unwrap();
    let dividers = road.lane_dividers();
    assert_eq!(dividers.len(), 2);
    assert!((dividers[0].start.x - 70.0).abs() < 1e-3);
    assert!((dividers[1].start.x - 130.0).abs() < 1e-3);

    let single = Road::new(100.0, 180.0, 1).unwrap();
    assert!(single.lane_dividers().is_empty());
}

#[test]
fn test_zero_lanes_is_a_configuration_error() {
    assert!(matches!(
        Road::new(100.0, 180.0, 0),
        Err(SimulationError::Configuration(_))
    ));
}

#[test]
fn test_non_positive_width_is_a_configuration_error() {
    assert!(matches!(
        Road::new(100.0, 0.0, 3),
        Err(SimulationError::Configuration(_))
    ));
}
