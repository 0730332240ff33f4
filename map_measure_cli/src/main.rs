use std::fs::File;

use clap::{Parser, Subcommand};
use log::debug;
#[cfg(feature = "export")]
use map_measure::{
    export::{export_pdf, ExportOptions},
    geometry::Extent,
    view::View,
};
use map_measure::{
    config::MeasureConfig,
    geometry::{square::regular_polygon, Geometry, GeometryType, LineString, Point, Polygon},
    gis::{Feature, VectorSource},
    io::{
        geojson::{read_features_geojson, write_features_geojson},
        read_points_csv,
    },
    labels::{MeasureStyles, StyleRequest},
    measure::{format_area, format_length, Measurement},
    select::select_intersecting,
    Result,
};

fn init_logging() {
    if let Ok(path) = std::env::var("MAP_MEASURE_LOG") {
        match File::create(&path) {
            Ok(file) => {
                env_logger::Builder::from_default_env()
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Failed to create log file {}: {}", path, e);
                env_logger::Builder::from_default_env().init();
            }
        }
    } else {
        env_logger::Builder::from_default_env().init();
    }
}

fn print_point(p: Point) {
    println!("{:.3},{:.3}", p.x, p.y);
}

/// Command line front end for the map measure tools.
#[derive(Parser)]
#[command(name = "map_measure_cli", version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<String>,
    /// How coordinates become meters: `planar` or `spherical` (Web Mercator).
    #[arg(long, global = true)]
    measurement: Option<Measurement>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a regular polygon (a square by default) from a circle drag.
    Square {
        cx: f64,
        cy: f64,
        ex: f64,
        ey: f64,
        #[arg(long, default_value_t = 4)]
        sides: usize,
        /// Also write the polygon to a GeoJSON file.
        #[arg(long)]
        output: Option<String>,
    },
    /// Print the formatted length of a line read from a CSV file of x,y pairs.
    Length { path: String },
    /// Print the formatted area of a polygon read from a CSV file of x,y pairs.
    Area { path: String },
    /// Print the measurement labels of every feature in a GeoJSON file.
    Labels {
        path: String,
        /// Label every segment as well.
        #[arg(long)]
        segments: bool,
        /// Only label features of this geometry type.
        #[arg(long)]
        restrict: Option<GeometryType>,
    },
    /// Print the ids of features touched by a square drawn from a drag.
    Select {
        path: String,
        cx: f64,
        cy: f64,
        ex: f64,
        ey: f64,
    },
    /// Export the features of a GeoJSON file to a landscape PDF.
    #[cfg(feature = "export")]
    ExportPdf {
        input: String,
        output: String,
        #[arg(long, default_value_t = 1024)]
        width: u32,
        #[arg(long, default_value_t = 768)]
        height: u32,
    },
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = match &cli.config {
        Some(path) => MeasureConfig::load(path)?,
        None => MeasureConfig::default(),
    };
    if let Some(measurement) = cli.measurement {
        cfg.measurement = measurement;
    }
    debug!("configuration: {cfg:?}");

    match cli.command {
        Commands::Square {
            cx,
            cy,
            ex,
            ey,
            sides,
            output,
        } => {
            let polygon = regular_polygon(Point::new(cx, cy), Point::new(ex, ey), sides, None)
                .into_owned();
            for p in polygon.outer_ring() {
                print_point(*p);
            }
            if let Some(output) = output {
                let feature = Feature::new(Geometry::Polygon(polygon));
                write_features_geojson(&output, [&feature])?;
                println!("Wrote {}", output);
            }
        }
        Commands::Length { path } => {
            let pts = read_points_csv(&path)?;
            let line = Geometry::LineString(LineString::new(pts));
            let length = cfg.measurement.length(&line);
            println!("Length: {}", format_length(length));
        }
        Commands::Area { path } => {
            let pts = read_points_csv(&path)?;
            let polygon = Geometry::Polygon(Polygon::from_ring(pts));
            let area = cfg.measurement.area(&polygon);
            println!("Area: {}", format_area(area));
        }
        Commands::Labels {
            path,
            segments,
            restrict,
        } => {
            let mut source = VectorSource::new();
            source.extend(read_features_geojson(&path)?);
            let mut styles = MeasureStyles::new(cfg.measurement);
            let request = StyleRequest {
                show_segments: segments || cfg.show_segments,
                restrict_to: restrict,
                ..Default::default()
            };
            for feature in source.iter() {
                let texts: Vec<&str> = styles
                    .style_feature(feature, &request)
                    .into_iter()
                    .filter_map(|s| s.text())
                    .collect();
                if let Some(id) = feature.id {
                    println!("{}: {}", id, texts.join(" | "));
                }
            }
        }
        Commands::Select {
            path,
            cx,
            cy,
            ex,
            ey,
        } => {
            let mut source = VectorSource::new();
            source.extend(read_features_geojson(&path)?);
            let square = Geometry::Polygon(
                regular_polygon(Point::new(cx, cy), Point::new(ex, ey), 4, None).into_owned(),
            );
            let ids = select_intersecting(&source, &square, None);
            println!("Selected {} feature(s)", ids.len());
            for id in ids {
                println!("{}", id);
            }
        }
        #[cfg(feature = "export")]
        Commands::ExportPdf {
            input,
            output,
            width,
            height,
        } => {
            let features = read_features_geojson(&input)?;
            let mut extent = Extent::empty();
            for f in &features {
                let e = f.geometry.extent();
                extent.extend(Point::new(e.min_x, e.min_y));
                extent.extend(Point::new(e.max_x, e.max_y));
            }
            let view = View::fit(&extent, width, height, 20);
            let mut styles = MeasureStyles::new(cfg.measurement);
            let options = ExportOptions::from(&cfg);
            export_pdf(&features, &view, &mut styles, &options, &output)?;
            println!("Exported {} feature(s) to {}", features.len(), output);
        }
    }
    Ok(())
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
