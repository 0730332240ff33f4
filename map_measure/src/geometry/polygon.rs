//! Polygons made of closed linear rings.

use super::{polygon_area, Extent, LineString, Point};

/// Polygon with an outer ring followed by zero or more holes.
///
/// Every ring is closed: its first and last coordinates are equal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    rings: Vec<Vec<Point>>,
}

impl Polygon {
    /// Creates a polygon, closing any ring whose ends differ.
    pub fn new(rings: Vec<Vec<Point>>) -> Self {
        let mut polygon = Self { rings: Vec::new() };
        polygon.set_coordinates(rings);
        polygon
    }

    /// Creates a polygon from a single outer ring.
    pub fn from_ring(ring: Vec<Point>) -> Self {
        Self::new(vec![ring])
    }

    /// Replaces all rings in place.
    pub fn set_coordinates(&mut self, mut rings: Vec<Vec<Point>>) {
        for ring in &mut rings {
            close_ring(ring);
        }
        self.rings = rings;
    }

    /// Returns all rings, outer ring first.
    pub fn rings(&self) -> &[Vec<Point>] {
        &self.rings
    }

    /// Returns the outer ring or an empty slice.
    pub fn outer_ring(&self) -> &[Point] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the outer ring as a line string.
    pub fn outer_ring_line(&self) -> LineString {
        LineString::new(self.outer_ring().to_vec())
    }

    /// Planar area of the outer ring minus its holes.
    pub fn area(&self) -> f64 {
        let mut rings = self.rings.iter();
        let Some(outer) = rings.next() else {
            return 0.0;
        };
        let mut area = ring_area(outer);
        for hole in rings {
            area -= ring_area(hole);
        }
        area.max(0.0)
    }

    /// Sum of all ring lengths.
    pub fn perimeter(&self) -> f64 {
        self.rings
            .iter()
            .map(|r| LineString::new(r.clone()).length())
            .sum()
    }

    pub fn extent(&self) -> Extent {
        Extent::from_points(self.outer_ring())
    }

    /// Even-odd containment test across all rings.
    pub fn contains(&self, p: Point) -> bool {
        let mut rings = self.rings.iter();
        let Some(outer) = rings.next() else {
            return false;
        };
        ring_contains(outer, p) && !rings.any(|hole| ring_contains(hole, p))
    }

    /// Returns a point guaranteed to lie inside the polygon when it has area.
    ///
    /// A horizontal line through the middle of the extent is intersected
    /// with every ring. The midpoint of the widest interval that falls inside
    /// the polygon wins. Degenerate polygons fall back to the extent center.
    pub fn interior_point(&self) -> Point {
        let extent = self.extent();
        let center = extent.center();
        let y = center.y;
        let mut crossings: Vec<f64> = Vec::new();
        for ring in &self.rings {
            for pair in ring.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if (a.y > y) != (b.y > y) {
                    crossings.push((y - a.y) * (b.x - a.x) / (b.y - a.y) + a.x);
                }
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        let mut best_x = None;
        let mut best_width = f64::NEG_INFINITY;
        for pair in crossings.windows(2) {
            let width = (pair[1] - pair[0]).abs();
            if width > best_width {
                let x = (pair[0] + pair[1]) / 2.0;
                if self.contains(Point::new(x, y)) {
                    best_x = Some(x);
                    best_width = width;
                }
            }
        }
        Point::new(best_x.unwrap_or(center.x), y)
    }
}

fn close_ring(ring: &mut Vec<Point>) {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
}

fn ring_area(ring: &[Point]) -> f64 {
    // shoelace wraps around on its own; drop the closing duplicate
    match ring.split_last() {
        Some((last, rest)) if ring.len() > 1 && Some(last) == ring.first() => polygon_area(rest),
        _ => polygon_area(ring),
    }
}

fn ring_contains(ring: &[Point], p: Point) -> bool {
    let mut inside = false;
    for pair in ring.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}
