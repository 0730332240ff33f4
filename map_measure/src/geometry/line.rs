//! Line segments and line strings.

use super::{distance, Extent, Point};

/// Representation of a 2D line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    /// Creates a new line segment.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns the length of the line segment.
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    /// Returns the point at `t` (0 at start, 1 at end) along the segment.
    pub fn interpolate(&self, t: f64) -> Point {
        Point::new(
            self.start.x + t * (self.end.x - self.start.x),
            self.start.y + t * (self.end.y - self.start.y),
        )
    }

    /// Returns the closest point on the segment to `p`.
    pub fn nearest_point(&self, p: Point) -> Point {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            return self.start;
        }
        let t = ((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len2;
        self.interpolate(t.clamp(0.0, 1.0))
    }

    /// Shortest distance from `p` to the segment.
    pub fn distance_to(&self, p: Point) -> f64 {
        distance(self.nearest_point(p), p)
    }

    /// True when the segments cross or touch. Zero-length segments act as
    /// points.
    pub fn intersects(&self, other: &Line) -> bool {
        let d1 = cross(self, other.start);
        let d2 = cross(self, other.end);
        let d3 = cross(other, self.start);
        let d4 = cross(other, self.end);
        if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
            return true;
        }
        self.distance_to(other.start) <= TOUCH_TOLERANCE
            || self.distance_to(other.end) <= TOUCH_TOLERANCE
            || other.distance_to(self.start) <= TOUCH_TOLERANCE
            || other.distance_to(self.end) <= TOUCH_TOLERANCE
    }
}

/// Distance below which two segments count as touching.
const TOUCH_TOLERANCE: f64 = 1e-9;

/// Which side of `line` the point `p` lies on.
fn cross(line: &Line, p: Point) -> f64 {
    (line.end.x - line.start.x) * (p.y - line.start.y)
        - (line.end.y - line.start.y) * (p.x - line.start.x)
}

/// Ordered sequence of connected coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    pub coordinates: Vec<Point>,
}

impl LineString {
    /// Creates a new line string from a list of coordinates.
    pub fn new(coordinates: Vec<Point>) -> Self {
        Self { coordinates }
    }

    /// Returns the last coordinate, if any.
    pub fn last_coordinate(&self) -> Option<Point> {
        self.coordinates.last().copied()
    }

    /// Iterator over consecutive coordinate pairs.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.coordinates
            .windows(2)
            .map(|pair| Line::new(pair[0], pair[1]))
    }

    /// Returns the planar length of all segments.
    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    /// Returns the coordinate found at `fraction` of the total arc length.
    ///
    /// Fractions outside `0..=1` are clamped. An empty line has no coordinate.
    pub fn coordinate_at(&self, fraction: f64) -> Option<Point> {
        let first = *self.coordinates.first()?;
        let total = self.length();
        if total == 0.0 {
            return Some(first);
        }
        let target = total * fraction.clamp(0.0, 1.0);
        let mut walked = 0.0;
        for seg in self.segments() {
            let len = seg.length();
            if len > 0.0 && walked + len >= target {
                return Some(seg.interpolate((target - walked) / len));
            }
            walked += len;
        }
        self.last_coordinate()
    }

    pub fn extent(&self) -> Extent {
        Extent::from_points(&self.coordinates)
    }
}
