//! Regular polygons built from a circle drag gesture.
//!
//! The draw tool hands over the drag center and the current pointer
//! position on every move. The first call allocates a polygon; later calls
//! rewrite the same polygon so the sketch redraws without churn.

use std::f64::consts::PI;

use super::{Circle, Point, Polygon};

/// Builds the closed ring of a regular polygon with `sides` vertices.
///
/// One vertex points in the direction from `edge` to `center`, matching the
/// angle of the drag. The ring has `sides + 1` points with first == last.
pub fn regular_polygon_ring(center: Point, edge: Point, sides: usize) -> Vec<Point> {
    let dx = center.x - edge.x;
    let dy = center.y - edge.y;
    let radius = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);
    let step = 2.0 * PI / sides as f64;

    let first = Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    );
    let mut ring: Vec<Point> = (0..sides)
        .map(|i| first.rotated_about(center, i as f64 * step))
        .collect();
    ring.push(first);
    ring
}

/// Creates or updates a regular polygon from a circle drag.
///
/// With `existing` set the polygon is overwritten in place and returned;
/// otherwise a new polygon is allocated.
pub fn regular_polygon<'a>(
    center: Point,
    edge: Point,
    sides: usize,
    existing: Option<&'a mut Polygon>,
) -> PolygonRef<'a> {
    let ring = regular_polygon_ring(center, edge, sides.max(3));
    match existing {
        Some(polygon) => {
            polygon.set_coordinates(vec![ring]);
            PolygonRef::Updated(polygon)
        }
        None => PolygonRef::Created(Polygon::from_ring(ring)),
    }
}

/// Square geometry function for a circle-style drag.
///
/// A zero-length drag yields a degenerate square with every vertex at
/// `center`.
pub fn square_from_circle<'a>(
    center: Point,
    edge: Point,
    existing: Option<&'a mut Polygon>,
) -> PolygonRef<'a> {
    regular_polygon(center, edge, 4, existing)
}

/// Result of a geometry function call.
#[derive(Debug)]
pub enum PolygonRef<'a> {
    /// A freshly allocated polygon.
    Created(Polygon),
    /// The caller's polygon, rewritten in place.
    Updated(&'a mut Polygon),
}

impl PolygonRef<'_> {
    /// Returns an owned copy of the polygon.
    pub fn into_owned(self) -> Polygon {
        match self {
            PolygonRef::Created(p) => p,
            PolygonRef::Updated(p) => p.clone(),
        }
    }
}

/// Shape produced from a two-point drag while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFunction {
    /// Plain circle around the first click.
    Circle,
    /// Four-sided regular polygon.
    Square,
}

impl GeometryFunction {
    /// Number of polygon sides, or `None` for a true circle.
    pub fn sides(&self) -> Option<usize> {
        match self {
            GeometryFunction::Circle => None,
            GeometryFunction::Square => Some(4),
        }
    }

    /// Builds a circle for [`GeometryFunction::Circle`].
    pub fn circle(center: Point, edge: Point) -> Circle {
        Circle::new(center, center.distance_to(edge))
    }
}
