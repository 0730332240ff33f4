//! Selection of stored features touched by a newly drawn shape.

use crate::geometry::Geometry;
use crate::gis::{FeatureId, VectorSource};

/// Ids of features that intersect `geometry`.
///
/// Extents are compared first; only overlapping candidates get the exact
/// geometry test. `exclude` skips the drawn feature itself once it has been
/// stored.
pub fn select_intersecting(
    source: &VectorSource,
    geometry: &Geometry,
    exclude: Option<FeatureId>,
) -> Vec<FeatureId> {
    let extent = geometry.extent();
    if extent.is_empty() {
        return Vec::new();
    }
    source
        .features_in_extent(&extent)
        .filter(|f| f.geometry.intersects(geometry))
        .filter_map(|f| f.id)
        .filter(|id| Some(*id) != exclude)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::square::square_from_circle;
    use crate::geometry::{Circle, LineString, Point, Polygon};
    use crate::gis::Feature;

    #[test]
    fn selects_overlapping_only() {
        let mut source = VectorSource::new();
        let near = source.add(Feature::new(Geometry::LineString(LineString::new(vec![
            Point::new(-5.0, 0.0),
            Point::new(5.0, 0.0),
        ]))));
        let _far = source.add(Feature::new(Geometry::Point(Point::new(100.0, 100.0))));
        let square = Geometry::Polygon(Polygon::from_ring(vec![
            Point::new(-1.0, -1.0),
            Point::new(1.0, -1.0),
            Point::new(1.0, 1.0),
            Point::new(-1.0, 1.0),
        ]));
        assert_eq!(select_intersecting(&source, &square, None), vec![near]);
        assert!(select_intersecting(&source, &square, Some(near)).is_empty());
    }

    #[test]
    fn corner_of_the_extent_is_not_selected() {
        let mut source = VectorSource::new();
        let corner = source.add(Feature::new(Geometry::Point(Point::new(0.9, 0.9))));
        let inside = source.add(Feature::new(Geometry::Point(Point::new(0.2, -0.2))));
        let touching = source.add(Feature::new(Geometry::Circle(Circle::new(
            Point::new(1.0, 1.0),
            0.8,
        ))));
        let diamond = Geometry::Polygon(
            square_from_circle(Point::new(0.0, 0.0), Point::new(1.0, 0.0), None).into_owned(),
        );
        let selected = select_intersecting(&source, &diamond, None);
        assert_eq!(selected, vec![inside, touching]);
        assert!(!selected.contains(&corner));
    }
}
