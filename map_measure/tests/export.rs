#![cfg(feature = "export")]

use std::path::Path;

use map_measure::{
    export::{export_pdf, rasterize, ExportOptions},
    geometry::{Circle, Extent, Geometry, LineString, Point},
    gis::Feature,
    labels::{MeasureStyles, StyleRequest},
    measure::Measurement,
    styles::Color,
    view::View,
    Error,
};

fn features() -> Vec<Feature> {
    vec![
        Feature::new(Geometry::LineString(LineString::new(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
        ]))),
        Feature::new(Geometry::Circle(Circle::new(Point::new(50.0, 50.0), 20.0))),
    ]
}

fn font_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

#[test]
fn fitted_view_draws_every_feature() {
    let features = features();
    let extent = Extent::new(0.0, 0.0, 100.0, 100.0);
    let view = View::fit(&extent, 200, 100, 10);
    let bg = Color::rgba(242, 239, 233, 1.0);
    let mut styles = MeasureStyles::new(Measurement::Planar);
    let img = rasterize(&features, &view, &mut styles, &StyleRequest::layer(true), bg).unwrap();
    assert_eq!(img.dimensions(), (200, 100));
    assert!(img.pixels().any(|p| p.0 != [242, 239, 233]));
}

#[test]
fn exports_a_pdf_with_bundled_fonts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.pdf");
    let options = ExportOptions {
        font_dir: font_dir(),
        show_segments: true,
        ..Default::default()
    };
    let features = features();
    let view = View::fit(&Extent::new(0.0, 0.0, 100.0, 100.0), 320, 240, 10);
    let mut styles = MeasureStyles::new(Measurement::Planar);

    export_pdf(&features, &view, &mut styles, &options, &out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(!bytes.is_empty());
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn missing_fonts_fail_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.pdf");
    let options = ExportOptions {
        font_dir: dir.path().join("no-fonts"),
        ..Default::default()
    };
    let view = View::new(Point::new(50.0, 50.0), 1.0, 64, 64);
    let mut styles = MeasureStyles::default();
    let err = export_pdf(&features(), &view, &mut styles, &options, &out).unwrap_err();
    assert!(matches!(err, Error::ExportFailed(_)));
    assert!(!out.exists());
}
