//! Length and area measurement plus label formatting.

use std::f64::consts::PI;

use crate::geometry::{square::regular_polygon_ring, Geometry, Point};

/// Mean earth radius used for spherical measurements, in meters.
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Semi-major axis of the Web Mercator projection.
const MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Sides used to approximate a circle on the sphere.
const CIRCLE_SIDES: usize = 32;

/// How map coordinates are turned into meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measurement {
    /// Coordinates are already planar meters.
    Planar,
    /// Coordinates are Web Mercator; measure along the sphere.
    #[default]
    Spherical,
}

impl std::str::FromStr for Measurement {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "planar" => Ok(Measurement::Planar),
            "spherical" => Ok(Measurement::Spherical),
            other => Err(format!("unknown measurement '{other}'")),
        }
    }
}

impl Measurement {
    /// Length of a geometry in meters. Polygons report their perimeter.
    pub fn length(&self, geometry: &Geometry) -> f64 {
        match (self, geometry) {
            (_, Geometry::Point(_)) => 0.0,
            (Measurement::Planar, Geometry::LineString(l)) => l.length(),
            (Measurement::Planar, Geometry::Polygon(p)) => p.perimeter(),
            (Measurement::Planar, Geometry::Circle(c)) => 2.0 * PI * c.radius,
            (Measurement::Spherical, Geometry::LineString(l)) => {
                spherical_length(&l.coordinates)
            }
            (Measurement::Spherical, Geometry::Polygon(p)) => {
                p.rings().iter().map(|r| spherical_length(r)).sum()
            }
            (Measurement::Spherical, Geometry::Circle(c)) => {
                let edge = Point::new(c.center.x + c.radius, c.center.y);
                spherical_length(&regular_polygon_ring(c.center, edge, CIRCLE_SIDES))
            }
        }
    }

    /// Area of a geometry in square meters. Lines and points have none.
    pub fn area(&self, geometry: &Geometry) -> f64 {
        match (self, geometry) {
            (_, Geometry::Point(_)) | (_, Geometry::LineString(_)) => 0.0,
            (Measurement::Planar, Geometry::Polygon(p)) => p.area(),
            (Measurement::Planar, Geometry::Circle(c)) => PI * c.radius * c.radius,
            (Measurement::Spherical, Geometry::Polygon(p)) => {
                let mut rings = p.rings().iter();
                let Some(outer) = rings.next() else {
                    return 0.0;
                };
                let mut area = spherical_ring_area(outer).abs();
                for hole in rings {
                    area -= spherical_ring_area(hole).abs();
                }
                area
            }
            (Measurement::Spherical, Geometry::Circle(c)) => {
                let edge = Point::new(c.center.x + c.radius, c.center.y);
                spherical_ring_area(&regular_polygon_ring(c.center, edge, CIRCLE_SIDES)).abs()
            }
        }
    }

    /// Formatted length label for `geometry`.
    pub fn length_label(&self, geometry: &Geometry) -> String {
        format_length(self.length(geometry))
    }

    /// Formatted area label for `geometry`.
    pub fn area_label(&self, geometry: &Geometry) -> String {
        format_area(self.area(geometry))
    }
}

/// Formats a length in meters: below 100 as `"m"`, otherwise as `"km"`.
pub fn format_length(length: f64) -> String {
    if length < 100.0 {
        format!("{} m", round2(length))
    } else {
        format!("{} km", round2(length / 1000.0))
    }
}

/// Formats an area in square meters: below 10000 as `"m²"`, otherwise `"km²"`.
pub fn format_area(area: f64) -> String {
    if area < 10_000.0 {
        format!("{} m\u{00B2}", round2(area))
    } else {
        format!("{} km\u{00B2}", round2(area / 1_000_000.0))
    }
}

/// Rounds half away from zero to two decimals.
fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid printing "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Converts Web Mercator meters to longitude/latitude degrees.
pub fn mercator_to_lon_lat(p: Point) -> Point {
    let lon = (p.x / MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (p.y / MERCATOR_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    Point::new(lon, lat)
}

/// Great-circle distance between two lon/lat points in meters.
pub fn haversine_distance(a: Point, b: Point) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.x - a.x).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    2.0 * EARTH_RADIUS * h.sqrt().atan2((1.0 - h).sqrt())
}

fn spherical_length(coords: &[Point]) -> f64 {
    coords
        .windows(2)
        .map(|pair| {
            haversine_distance(mercator_to_lon_lat(pair[0]), mercator_to_lon_lat(pair[1]))
        })
        .sum()
}

/// Signed area of a ring on the sphere using the spherical excess sum.
fn spherical_ring_area(ring: &[Point]) -> f64 {
    let Some(last) = ring.last() else {
        return 0.0;
    };
    let lon_lat: Vec<Point> = ring.iter().map(|p| mercator_to_lon_lat(*p)).collect();
    let last = mercator_to_lon_lat(*last);
    let (mut x1, mut y1) = (last.x, last.y);
    let mut area = 0.0;
    for p in &lon_lat {
        area += (p.x - x1).to_radians() * (2.0 + y1.to_radians().sin() + p.y.to_radians().sin());
        x1 = p.x;
        y1 = p.y;
    }
    area * EARTH_RADIUS * EARTH_RADIUS / 2.0
}
