use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const LINE_GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{},
   "geometry":{"type":"LineString","coordinates":[[0,0],[30,40],[30,140]]}}
]}"#;

#[test]
fn square_command() {
    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args(["square", "0", "0", "1", "0"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-1.000,0.000"))
        .stdout(predicate::function(|s: &str| s.lines().count() == 5));
}

#[test]
fn square_command_writes_geojson() {
    let dir = assert_fs::TempDir::new().unwrap();
    let out = dir.child("square.geojson");

    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args(["square", "5", "5", "5", "7", "--output", out.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    out.assert(predicate::str::contains("\"Polygon\""));
    dir.close().unwrap();
}

#[test]
fn length_command() {
    let file = assert_fs::NamedTempFile::new("line.csv").unwrap();
    file.write_str("0,0\n30,40\n").unwrap();

    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args(["length", file.path().to_str().unwrap(), "--measurement", "planar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Length: 50 m"));
}

#[test]
fn length_defaults_to_spherical() {
    let file = assert_fs::NamedTempFile::new("line.csv").unwrap();
    file.write_str("0,4600000
1000,4600000
").unwrap();

    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args(["length", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Length: 0.79 km"));
}

#[test]
fn area_command() {
    let file = assert_fs::NamedTempFile::new("poly.csv").unwrap();
    file.write_str("0,0\n100,0\n100,50\n0,50\n").unwrap();

    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args(["area", file.path().to_str().unwrap(), "--measurement", "planar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Area: 5000 m\u{00B2}"));
}

#[test]
fn bad_csv_fails() {
    let file = assert_fs::NamedTempFile::new("bad.csv").unwrap();
    file.write_str("0,0\nnope\n").unwrap();

    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args(["length", file.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn labels_command_with_segments() {
    let file = assert_fs::NamedTempFile::new("line.geojson").unwrap();
    file.write_str(LINE_GEOJSON).unwrap();

    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args(["labels", file.path().to_str().unwrap(), "--segments"])
        .args(["--measurement", "planar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1: 50 m | 0.1 km | 0.15 km"));
}

#[test]
fn labels_command_restricted_to_polygons() {
    let file = assert_fs::NamedTempFile::new("line.geojson").unwrap();
    file.write_str(LINE_GEOJSON).unwrap();

    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args(["labels", file.path().to_str().unwrap(), "--restrict", "polygon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1: \n"));
}

#[test]
fn select_command() {
    let file = assert_fs::NamedTempFile::new("pts.geojson").unwrap();
    file.write_str(
        r#"{"type":"FeatureCollection","features":[
          {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0.2,0.2]}},
          {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0.9,0.9]}},
          {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[100,100]}}
        ]}"#,
    )
    .unwrap();

    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args(["select", file.path().to_str().unwrap(), "0", "0", "1", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected 1 feature(s)\n1\n"));
}

#[test]
fn export_pdf_without_fonts_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    let input = dir.child("line.geojson");
    input.write_str(LINE_GEOJSON).unwrap();
    let config = dir.child("config.json");
    config
        .write_str(r#"{"font_dir": "/nonexistent/fonts"}"#)
        .unwrap();
    let output = dir.child("map.pdf");

    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args([
            "export-pdf",
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("export failed"));

    output.assert(predicate::path::missing());
    dir.close().unwrap();
}

#[test]
fn export_pdf_with_bundled_fonts() {
    let dir = assert_fs::TempDir::new().unwrap();
    let input = dir.child("line.geojson");
    input.write_str(LINE_GEOJSON).unwrap();
    let fonts = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../map_measure/assets");
    let config = dir.child("config.json");
    config
        .write_str(&format!(r#"{{"font_dir": {:?}}}"#, fonts.display().to_string()))
        .unwrap();
    let output = dir.child("map.pdf");

    Command::cargo_bin("map_measure_cli")
        .unwrap()
        .args([
            "export-pdf",
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 feature(s)"));

    output.assert(predicate::path::exists());
    assert!(std::fs::metadata(output.path()).unwrap().len() > 0);
    dir.close().unwrap();
}
