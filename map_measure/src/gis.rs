use std::collections::BTreeMap;

use crate::geometry::{Extent, Geometry};

/// Identifier assigned to a feature when it enters a [`VectorSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(pub u64);

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geometry with optional feature class and GIS attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Set once the feature is stored in a source.
    pub id: Option<FeatureId>,
    /// Optional feature class name, e.g. layer or category.
    pub class: Option<String>,
    /// Arbitrary attribute key/value pairs.
    pub attributes: BTreeMap<String, String>,
    pub geometry: Geometry,
}

impl Feature {
    /// Creates a new feature with empty attributes.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            class: None,
            attributes: BTreeMap::new(),
            geometry,
        }
    }
}

/// Feature collection backing a vector layer.
#[derive(Debug, Default)]
pub struct VectorSource {
    features: BTreeMap<FeatureId, Feature>,
    next_id: u64,
}

impl VectorSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `feature` and returns its new id.
    pub fn add(&mut self, mut feature: Feature) -> FeatureId {
        self.next_id += 1;
        let id = FeatureId(self.next_id);
        feature.id = Some(id);
        self.features.insert(id, feature);
        id
    }

    /// Removes every feature. Ids keep increasing.
    pub fn clear(&mut self) {
        self.features.clear();
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    /// Iterator over features in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features whose extent intersects `extent`.
    pub fn features_in_extent<'a>(
        &'a self,
        extent: &'a Extent,
    ) -> impl Iterator<Item = &'a Feature> + 'a {
        self.features
            .values()
            .filter(move |f| f.geometry.extent().intersects(extent))
    }
}

impl Extend<Feature> for VectorSource {
    fn extend<I: IntoIterator<Item = Feature>>(&mut self, iter: I) {
        for feature in iter {
            self.add(feature);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn ids_keep_increasing_after_clear() {
        let mut source = VectorSource::new();
        let a = source.add(Feature::new(Geometry::Point(Point::new(0.0, 0.0))));
        source.clear();
        let b = source.add(Feature::new(Geometry::Point(Point::new(1.0, 1.0))));
        assert!(b > a);
        assert_eq!(source.len(), 1);
        assert_eq!(source.get(b).and_then(|f| f.id), Some(b));
    }

    #[test]
    fn extent_query() {
        let mut source = VectorSource::new();
        source.add(Feature::new(Geometry::Point(Point::new(0.0, 0.0))));
        source.add(Feature::new(Geometry::Point(Point::new(10.0, 10.0))));
        let extent = Extent::new(-1.0, -1.0, 1.0, 1.0);
        assert_eq!(source.features_in_extent(&extent).count(), 1);
    }
}
