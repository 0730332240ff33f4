//! GeoJSON import and export of drawn features.
//!
//! Circles have no GeoJSON type; they are written as points carrying a
//! `radius` property and read back the same way.

use ::geojson::{feature::Id, FeatureCollection, GeoJson, JsonObject, JsonValue};

use crate::error::{Error, Result};
use crate::geometry::{Circle, Geometry, LineString, Point, Polygon};
use crate::gis::Feature;

const RADIUS_PROPERTY: &str = "radius";
const CLASS_PROPERTY: &str = "class";

fn to_geo(geometry: &Geometry) -> geo_types::Geometry<f64> {
    fn line(coords: &[Point]) -> geo_types::LineString<f64> {
        coords.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>().into()
    }
    match geometry {
        Geometry::Point(p) => geo_types::Point::new(p.x, p.y).into(),
        Geometry::Circle(c) => geo_types::Point::new(c.center.x, c.center.y).into(),
        Geometry::LineString(l) => line(&l.coordinates).into(),
        Geometry::Polygon(poly) => {
            let mut rings = poly.rings().iter();
            let exterior = rings.next().map(|r| line(r)).unwrap_or_else(|| line(&[]));
            geo_types::Polygon::new(exterior, rings.map(|r| line(r)).collect()).into()
        }
    }
}

fn from_geo(geometry: geo_types::Geometry<f64>, out: &mut Vec<Geometry>) -> Result<()> {
    fn points(line: &geo_types::LineString<f64>) -> Vec<Point> {
        line.coords().map(|c| Point::new(c.x, c.y)).collect()
    }
    fn polygon(poly: &geo_types::Polygon<f64>) -> Polygon {
        let mut rings = vec![points(poly.exterior())];
        rings.extend(poly.interiors().iter().map(points));
        Polygon::new(rings)
    }
    match geometry {
        geo_types::Geometry::Point(p) => out.push(Geometry::Point(Point::new(p.x(), p.y()))),
        geo_types::Geometry::LineString(l) => {
            out.push(Geometry::LineString(LineString::new(points(&l))))
        }
        geo_types::Geometry::Polygon(p) => out.push(Geometry::Polygon(polygon(&p))),
        geo_types::Geometry::MultiPoint(mp) => out.extend(
            mp.iter()
                .map(|p| Geometry::Point(Point::new(p.x(), p.y()))),
        ),
        geo_types::Geometry::MultiLineString(ml) => out.extend(
            ml.iter()
                .map(|l| Geometry::LineString(LineString::new(points(l)))),
        ),
        geo_types::Geometry::MultiPolygon(mp) => {
            out.extend(mp.iter().map(|p| Geometry::Polygon(polygon(p))))
        }
        geo_types::Geometry::GeometryCollection(gc) => {
            for g in gc {
                from_geo(g, out)?;
            }
        }
        other => {
            return Err(Error::InvalidData(format!(
                "unsupported geometry: {other:?}"
            )))
        }
    }
    Ok(())
}

fn property_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn features_from_geojson(feature: ::geojson::Feature, out: &mut Vec<Feature>) -> Result<()> {
    let Some(geometry) = feature.geometry else {
        return Ok(());
    };
    let mut properties = feature.properties.unwrap_or_default();
    let radius = properties
        .get(RADIUS_PROPERTY)
        .and_then(JsonValue::as_f64);
    let class = properties
        .remove(CLASS_PROPERTY)
        .map(|v| property_string(&v));

    let mut geometries = Vec::new();
    from_geo(geo_types::Geometry::<f64>::try_from(geometry)?, &mut geometries)?;
    for geometry in geometries {
        let geometry = match (geometry, radius) {
            (Geometry::Point(center), Some(r)) => Geometry::Circle(Circle::new(center, r)),
            (g, _) => g,
        };
        let is_circle = matches!(geometry, Geometry::Circle(_));
        let mut f = Feature::new(geometry);
        f.class = class.clone();
        f.attributes = properties
            .iter()
            .filter(|(k, _)| !(is_circle && k.as_str() == RADIUS_PROPERTY))
            .map(|(k, v)| (k.clone(), property_string(v)))
            .collect();
        out.push(f);
    }
    Ok(())
}

/// Parses every feature of a GeoJSON document.
///
/// Multi-geometries and collections are split into one feature per part.
pub fn parse_features_geojson(text: &str) -> Result<Vec<Feature>> {
    let gj: GeoJson = text.parse()?;
    let features = match gj {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![::geojson::Feature {
            bbox: None,
            geometry: Some(g),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };
    let mut out = Vec::new();
    for feature in features {
        features_from_geojson(feature, &mut out)?;
    }
    Ok(out)
}

/// Serializes features to a GeoJSON feature collection.
pub fn features_to_geojson<'a>(features: impl IntoIterator<Item = &'a Feature>) -> String {
    let features = features
        .into_iter()
        .map(|f| {
            let mut properties = JsonObject::new();
            for (k, v) in &f.attributes {
                properties.insert(k.clone(), JsonValue::String(v.clone()));
            }
            if let Some(class) = &f.class {
                properties.insert(CLASS_PROPERTY.to_string(), JsonValue::String(class.clone()));
            }
            if let Geometry::Circle(c) = &f.geometry {
                properties.insert(RADIUS_PROPERTY.to_string(), JsonValue::from(c.radius));
            }
            ::geojson::Feature {
                bbox: None,
                geometry: Some(::geojson::Geometry::new(::geojson::Value::from(&to_geo(
                    &f.geometry,
                )))),
                id: f.id.map(|id| Id::Number(id.0.into())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    GeoJson::from(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
    .to_string()
}

/// Reads features from a GeoJSON file.
pub fn read_features_geojson(path: &str) -> Result<Vec<Feature>> {
    parse_features_geojson(&super::read_to_string(path)?)
}

/// Writes features to a GeoJSON file.
pub fn write_features_geojson<'a>(
    path: &str,
    features: impl IntoIterator<Item = &'a Feature>,
) -> Result<()> {
    super::write_string(path, &features_to_geojson(features))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_survives_geojson() {
        let mut feature = Feature::new(Geometry::Circle(Circle::new(Point::new(1.0, 2.0), 3.0)));
        feature.class = Some("zone".into());
        let text = features_to_geojson([&feature]);
        let back = parse_features_geojson(&text).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].geometry, feature.geometry);
        assert_eq!(back[0].class.as_deref(), Some("zone"));
        assert!(back[0].attributes.is_empty());
    }

    #[test]
    fn multipolygon_is_split() {
        let text = r#"{"type":"MultiPolygon","coordinates":[
            [[[0,0],[1,0],[1,1],[0,0]]],
            [[[5,5],[6,5],[6,6],[5,5]]]
        ]}"#;
        let features = parse_features_geojson(text).unwrap();
        assert_eq!(features.len(), 2);
        assert!(features
            .iter()
            .all(|f| matches!(f.geometry, Geometry::Polygon(_))));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_features_geojson("{not json").is_err());
    }
}
