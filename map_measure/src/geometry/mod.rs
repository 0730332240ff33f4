//! Basic geometry primitives for map drawing.

pub mod line;
pub mod point;
pub mod polygon;
pub mod square;

pub use line::{Line, LineString};
pub use point::Point;
pub use polygon::Polygon;

/// Kind of a [`Geometry`], used to restrict which features get labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    Circle,
}

impl std::fmt::Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::Circle => "Circle",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for GeometryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "point" => Ok(GeometryType::Point),
            "linestring" | "line" => Ok(GeometryType::LineString),
            "polygon" => Ok(GeometryType::Polygon),
            "circle" => Ok(GeometryType::Circle),
            other => Err(format!("unknown geometry type '{other}'")),
        }
    }
}

/// Circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn extent(&self) -> Extent {
        Extent::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }
}

/// Feature geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    Circle(Circle),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::Circle(_) => GeometryType::Circle,
        }
    }

    /// Bounding box of the geometry.
    pub fn extent(&self) -> Extent {
        match self {
            Geometry::Point(p) => Extent::new(p.x, p.y, p.x, p.y),
            Geometry::LineString(l) => l.extent(),
            Geometry::Polygon(p) => p.extent(),
            Geometry::Circle(c) => c.extent(),
        }
    }

    /// Iterator over every vertex of the geometry.
    pub fn vertices(&self) -> Box<dyn Iterator<Item = Point> + '_> {
        match self {
            Geometry::Point(p) => Box::new(std::iter::once(*p)),
            Geometry::LineString(l) => Box::new(l.coordinates.iter().copied()),
            Geometry::Polygon(p) => Box::new(p.rings().iter().flatten().copied()),
            Geometry::Circle(c) => Box::new(std::iter::once(c.center)),
        }
    }

    /// Edges of the geometry. A point is a single zero-length edge; a
    /// circle has none.
    fn edges(&self) -> Vec<Line> {
        match self {
            Geometry::Point(p) => vec![Line::new(*p, *p)],
            Geometry::LineString(l) if l.coordinates.len() == 1 => {
                vec![Line::new(l.coordinates[0], l.coordinates[0])]
            }
            Geometry::LineString(l) => l.segments().collect(),
            Geometry::Polygon(p) => p
                .rings()
                .iter()
                .flat_map(|ring| ring.windows(2).map(|w| Line::new(w[0], w[1])))
                .collect(),
            Geometry::Circle(_) => Vec::new(),
        }
    }

    /// True when `p` lies in the area enclosed by the geometry.
    fn covers(&self, p: Point) -> bool {
        match self {
            Geometry::Polygon(poly) => poly.contains(p),
            Geometry::Circle(c) => c.center.distance_to(p) <= c.radius,
            Geometry::Point(_) | Geometry::LineString(_) => false,
        }
    }

    /// Distance from `p` to the geometry; zero inside polygons and circles.
    pub fn distance_to_point(&self, p: Point) -> f64 {
        match self {
            Geometry::Circle(c) => (c.center.distance_to(p) - c.radius).max(0.0),
            g if g.covers(p) => 0.0,
            g => g
                .edges()
                .iter()
                .map(|e| e.distance_to(p))
                .fold(f64::INFINITY, f64::min),
        }
    }

    /// True when the two geometries share at least one point.
    pub fn intersects(&self, other: &Geometry) -> bool {
        match (self, other) {
            (Geometry::Circle(a), Geometry::Circle(b)) => {
                a.center.distance_to(b.center) <= a.radius + b.radius
            }
            (Geometry::Circle(c), g) | (g, Geometry::Circle(c)) => {
                g.distance_to_point(c.center) <= c.radius
            }
            _ => {
                let theirs = other.edges();
                self.edges()
                    .iter()
                    .any(|a| theirs.iter().any(|b| a.intersects(b)))
                    || self.vertices().any(|v| other.covers(v))
                    || other.vertices().any(|v| self.covers(v))
            }
        }
    }
}

/// Axis-aligned bounding box `[min_x, min_y, max_x, max_y]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Empty extent that any point will grow.
    pub fn empty() -> Self {
        Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        )
    }

    pub fn from_points(points: &[Point]) -> Self {
        let mut extent = Self::empty();
        for p in points {
            extent.extend(*p);
        }
        extent
    }

    pub fn extend(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// True when the two boxes overlap or touch.
    pub fn intersects(&self, other: &Extent) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}

/// Calculates the Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Calculates the area of a simple polygon using the shoelace formula.
pub fn polygon_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        sum += vertices[i].x * vertices[j].y - vertices[j].x * vertices[i].y;
    }
    sum.abs() * 0.5
}
