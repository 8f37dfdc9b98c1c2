//! Geometric primitives for segment and polygon intersection.
//!
//! Points and segments reuse the `geo` coordinate types. Polygons are plain
//! point slices, closed implicitly: edge `i` joins point `i` to point
//! `(i + 1) % len`.

use geo::{Coord, Line};
use serde::{Deserialize, Serialize};

/// A 2D point in road coordinates.
pub type Point = Coord<f32>;

/// An ordered pair of points.
pub type Segment = Line<f32>;

/// Oriented rectangle describing a vehicle footprint.
pub type Polygon = [Point; 4];

/// Where two segments cross.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// The crossing point, interpolated along the first segment.
    pub point: Point,
    /// Parametric position of the crossing along the first segment, in `[0, 1]`.
    pub offset: f32,
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Intersects segment `ab` with segment `cd`.
///
/// # Returns
///
/// `None` for parallel or collinear segments and for crossings that fall
/// outside either segment. Otherwise the crossing point on `ab` together with
/// its offset along `ab`.
pub fn segment_intersection(a: Point, b: Point, c: Point, d: Point) -> Option<Intersection> {
    let t_top = (d.x - c.x) * (a.y - c.y) - (d.y - c.y) * (a.x - c.x);
    let u_top = (c.y - a.y) * (a.x - b.x) - (c.x - a.x) * (a.y - b.y);
    let bottom = (d.y - c.y) * (b.x - a.x) - (d.x - c.x) * (b.y - a.y);

    if bottom == 0.0 {
        return None;
    }

    let t = t_top / bottom;
    let u = u_top / bottom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(Intersection {
        point: Coord {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
        },
        offset: t,
    })
}

/// Iterates the closed edges of a polygon.
pub fn edges(polygon: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Returns `true` if any edge of `p` crosses any edge of `q`.
///
/// Containment without an edge crossing is not an intersection.
pub fn polygons_intersect(p: &[Point], q: &[Point]) -> bool {
    edges(p).any(|(a, b)| edges(q).any(|(c, d)| segment_intersection(a, b, c, d).is_some()))
}

/// Returns `true` if `segment` crosses any edge of `polygon`.
pub fn polygon_intersects_segment(polygon: &[Point], segment: &Segment) -> bool {
    edges(polygon).any(|(a, b)| segment_intersection(a, b, segment.start, segment.end).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn edges_wrap_around() {
        let square = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 1.0 },
        ];
        let all: Vec<_> = edges(&square).collect();
        assert_eq!(all.len(), 4);
        assert_eq!(all[3], (square[3], square[0]));
    }
}
