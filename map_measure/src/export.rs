//! Map view export: rasterize the visible features, then place the image on
//! a landscape PDF page.

use std::path::{Path, PathBuf};

use image::RgbImage;
use log::{info, warn};
use tiny_skia::{
    FillRule, Paint, PathBuilder, Pixmap, Stroke as SkStroke, StrokeDash, Transform,
};

use crate::config::MeasureConfig;
use crate::error::{Error, Result};
use crate::geometry::{Geometry, Point};
use crate::gis::Feature;
use crate::labels::{MeasureStyles, StyleRequest};
use crate::styles::{Color, Fill, ImageStyle, Stroke, Style};
use crate::view::View;

/// Landscape A4 in millimeters.
const PAGE_WIDTH_MM: i32 = 297;
const PAGE_HEIGHT_MM: i32 = 210;
const MARGIN_MM: i32 = 10;
/// Room left for the title paragraph.
const TITLE_MM: f64 = 15.0;
/// Resolution genpdf assumes for unscaled images.
const IMAGE_DPI: f64 = 300.0;

/// Settings for [`export_pdf`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub font_dir: PathBuf,
    pub font_name: String,
    pub title: String,
    pub background: Color,
    /// Label every segment, as on screen.
    pub show_segments: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&MeasureConfig::default())
    }
}

impl From<&MeasureConfig> for ExportOptions {
    fn from(cfg: &MeasureConfig) -> Self {
        Self {
            font_dir: cfg.font_dir.clone(),
            font_name: cfg.font_name.clone(),
            title: cfg.export_title.clone(),
            background: Color::rgba(242, 239, 233, 1.0),
            show_segments: cfg.show_segments,
        }
    }
}

fn export_failed(stage: &str, e: impl std::fmt::Display) -> Error {
    warn!("export {stage} failed: {e}");
    Error::ExportFailed(format!("{stage}: {e}"))
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.alpha_u8());
    paint.anti_alias = true;
    paint
}

fn sk_stroke(stroke: &Stroke) -> SkStroke {
    SkStroke {
        width: stroke.width,
        dash: if stroke.line_dash.is_empty() {
            None
        } else {
            StrokeDash::new(stroke.line_dash.clone(), 0.0)
        },
        ..Default::default()
    }
}

fn ring_path(pb: &mut PathBuilder, view: &View, ring: &[Point], close: bool) {
    let mut pixels = ring.iter().map(|p| view.to_pixel(*p));
    if let Some((x, y)) = pixels.next() {
        pb.move_to(x, y);
        for (x, y) in pixels {
            pb.line_to(x, y);
        }
        if close {
            pb.close();
        }
    }
}

fn draw_path(
    pixmap: &mut Pixmap,
    path: &tiny_skia::Path,
    fill: Option<&Fill>,
    stroke: Option<&Stroke>,
) {
    if let Some(fill) = fill {
        pixmap.fill_path(
            path,
            &paint_for(fill.color),
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
    }
    if let Some(stroke) = stroke {
        pixmap.stroke_path(
            path,
            &paint_for(stroke.color),
            &sk_stroke(stroke),
            Transform::identity(),
            None,
        );
    }
}

/// Draws a point marker centered on pixel `(x, y)`.
fn draw_marker(pixmap: &mut Pixmap, image: &ImageStyle, x: f32, y: f32) {
    match image {
        ImageStyle::Circle {
            radius,
            fill,
            stroke,
        } => {
            if let Some(path) = PathBuilder::from_circle(x, y, *radius) {
                draw_path(pixmap, &path, fill.as_ref(), stroke.as_ref());
            }
        }
        ImageStyle::RegularShape {
            points,
            radius,
            angle,
            displacement,
            fill,
        } => {
            if *points < 3 {
                return;
            }
            // displacement is in screen units with y pointing up
            let cx = x + displacement[0];
            let cy = y - displacement[1];
            let step = 2.0 * std::f32::consts::PI / *points as f32;
            let mut pb = PathBuilder::new();
            for i in 0..*points {
                let theta = angle + i as f32 * step;
                let (px, py) = (cx + radius * theta.sin(), cy - radius * theta.cos());
                if i == 0 {
                    pb.move_to(px, py);
                } else {
                    pb.line_to(px, py);
                }
            }
            pb.close();
            if let Some(path) = pb.finish() {
                draw_path(pixmap, &path, fill.as_ref(), None);
            }
        }
    }
}

fn draw_feature(pixmap: &mut Pixmap, view: &View, geometry: &Geometry, style: &Style) {
    match geometry {
        Geometry::Point(p) => {
            if let Some(image) = &style.image {
                let (x, y) = view.to_pixel(*p);
                draw_marker(pixmap, image, x, y);
            }
        }
        Geometry::Circle(c) => {
            let (x, y) = view.to_pixel(c.center);
            let r = (c.radius / view.resolution) as f32;
            if let Some(path) = PathBuilder::from_circle(x, y, r) {
                draw_path(pixmap, &path, style.fill.as_ref(), style.stroke.as_ref());
            }
        }
        Geometry::LineString(l) => {
            let mut pb = PathBuilder::new();
            ring_path(&mut pb, view, &l.coordinates, false);
            if let Some(path) = pb.finish() {
                draw_path(pixmap, &path, None, style.stroke.as_ref());
            }
        }
        Geometry::Polygon(poly) => {
            let mut pb = PathBuilder::new();
            for ring in poly.rings() {
                ring_path(&mut pb, view, ring, true);
            }
            if let Some(path) = pb.finish() {
                draw_path(pixmap, &path, style.fill.as_ref(), style.stroke.as_ref());
            }
        }
    }
}

/// Draws one evaluated style. Anchored label styles only contribute their
/// pointer marker; glyphs are not rasterized.
fn draw_style(pixmap: &mut Pixmap, view: &View, geometry: &Geometry, style: &Style) {
    match (style.geometry, &style.image) {
        (None, _) => draw_feature(pixmap, view, geometry, style),
        (Some(anchor), Some(image)) => {
            let (x, y) = view.to_pixel(anchor);
            draw_marker(pixmap, image, x, y);
        }
        (Some(_), None) => {}
    }
}

fn visible<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
    view: &View,
) -> impl Iterator<Item = &'a Feature> {
    let extent = view.extent();
    features
        .into_iter()
        .filter(move |f| f.geometry.extent().intersects(&extent))
}

/// Renders the features inside `view` onto an opaque RGB image.
///
/// Each feature is drawn with the styles `styles` evaluates for it under
/// `request`, so measurement labels show up as their pointer markers.
pub fn rasterize<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
    view: &View,
    styles: &mut MeasureStyles,
    request: &StyleRequest<'_>,
    background: Color,
) -> Result<RgbImage> {
    let mut pixmap = Pixmap::new(view.width, view.height).ok_or_else(|| {
        export_failed(
            "rasterize",
            format!("empty view {}x{}", view.width, view.height),
        )
    })?;
    pixmap.fill(tiny_skia::Color::from_rgba8(
        background.r,
        background.g,
        background.b,
        255,
    ));

    let mut drawn = 0usize;
    for feature in visible(features, view) {
        for style in styles.style_feature(feature, request) {
            draw_style(&mut pixmap, view, &feature.geometry, style);
        }
        drawn += 1;
    }
    info!("rasterized {drawn} feature(s) at {}x{}", view.width, view.height);

    let rgb: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue()]
        })
        .collect();
    RgbImage::from_raw(view.width, view.height, rgb)
        .ok_or_else(|| export_failed("rasterize", "pixel buffer size mismatch"))
}

/// Label texts of the features inside `view`, one line per labelled feature.
pub fn label_legend<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
    view: &View,
    styles: &mut MeasureStyles,
    request: &StyleRequest<'_>,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, feature) in visible(features, view).enumerate() {
        let texts: Vec<&str> = styles
            .style_feature(feature, request)
            .into_iter()
            .filter_map(|s| s.text())
            .collect();
        if texts.is_empty() {
            continue;
        }
        let name = feature
            .id
            .map_or_else(|| format!("#{}", index + 1), |id| id.to_string());
        lines.push(format!("{}: {}", name, texts.join(" | ")));
    }
    lines
}

/// Scale that fits an image of the given pixel size below the title.
fn image_scale(width_px: u32, height_px: u32) -> f64 {
    let natural_w = width_px as f64 / IMAGE_DPI * 25.4;
    let natural_h = height_px as f64 / IMAGE_DPI * 25.4;
    let avail_w = (PAGE_WIDTH_MM - 2 * MARGIN_MM) as f64;
    let avail_h = (PAGE_HEIGHT_MM - 2 * MARGIN_MM) as f64 - TITLE_MM;
    (avail_w / natural_w).min(avail_h / natural_h)
}

/// Exports the current view as a one-page landscape PDF at `path`.
///
/// Every failure, from font loading to writing the file, is reported as
/// [`Error::ExportFailed`]. Nothing in the draw session is touched.
pub fn export_pdf(
    features: &[Feature],
    view: &View,
    styles: &mut MeasureStyles,
    options: &ExportOptions,
    path: impl AsRef<Path>,
) -> Result<()> {
    let fonts = genpdf::fonts::from_files(&options.font_dir, &options.font_name, None)
        .map_err(|e| export_failed("loading fonts", e))?;

    let request = StyleRequest::layer(options.show_segments);
    let image = rasterize(features, view, styles, &request, options.background)?;
    let legend = label_legend(features, view, styles, &request);
    let png = tempfile::Builder::new()
        .prefix("map-export")
        .suffix(".png")
        .tempfile()
        .map_err(|e| export_failed("creating temporary image", e))?;
    image
        .save_with_format(png.path(), image::ImageFormat::Png)
        .map_err(|e| export_failed("encoding image", e))?;

    let mut doc = genpdf::Document::new(fonts);
    doc.set_title(options.title.clone());
    doc.set_paper_size(genpdf::Size::new(PAGE_WIDTH_MM, PAGE_HEIGHT_MM));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(MARGIN_MM);
    doc.set_page_decorator(decorator);
    doc.push(genpdf::elements::Paragraph::new(options.title.clone()));

    let scale = image_scale(image.width(), image.height());
    let element = genpdf::elements::Image::from_path(png.path())
        .map_err(|e| export_failed("loading image", e))?
        .with_alignment(genpdf::Alignment::Center)
        .with_scale(genpdf::Scale::new(scale, scale));
    doc.push(element);
    if !legend.is_empty() {
        doc.push(genpdf::elements::Break::new(1));
        for line in legend {
            doc.push(genpdf::elements::Paragraph::new(line));
        }
    }

    doc.render_to_file(path.as_ref())
        .map_err(|e| export_failed("writing PDF", e))?;
    info!("exported map view to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Polygon};
    use crate::gis::FeatureId;
    use crate::measure::Measurement;

    fn planar() -> MeasureStyles {
        MeasureStyles::new(Measurement::Planar)
    }

    #[test]
    fn scale_fits_page() {
        let s = image_scale(1024, 768);
        let w = 1024.0 / IMAGE_DPI * 25.4 * s;
        let h = 768.0 / IMAGE_DPI * 25.4 * s;
        assert!(w <= 277.0 + 1e-9);
        assert!(h <= 175.0 + 1e-9);
    }

    #[test]
    fn polygon_pixels_differ_from_background() {
        let view = View::new(Point::new(0.0, 0.0), 1.0, 64, 64);
        let feature = Feature::new(Geometry::Polygon(Polygon::from_ring(vec![
            Point::new(-20.0, -20.0),
            Point::new(20.0, -20.0),
            Point::new(20.0, 20.0),
            Point::new(-20.0, 20.0),
        ])));
        let bg = Color::rgba(10, 20, 30, 1.0);
        let request = StyleRequest::layer(false);
        let img = rasterize([&feature], &view, &mut planar(), &request, bg).unwrap();
        assert_eq!(img.dimensions(), (64, 64));
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30]);
        assert_ne!(img.get_pixel(32, 32).0, [10, 20, 30]);
    }

    #[test]
    fn label_pointer_is_drawn_above_the_line_end() {
        // the line is a single horizontal stroke through the middle row
        let view = View::new(Point::new(0.0, 0.0), 1.0, 64, 64);
        let feature = Feature::new(Geometry::LineString(LineString::new(vec![
            Point::new(-20.0, 0.0),
            Point::new(20.0, 0.0),
        ])));
        let bg = Color::rgba(255, 255, 255, 1.0);
        let request = StyleRequest::layer(false);
        let img = rasterize([&feature], &view, &mut planar(), &request, bg).unwrap();
        let (x, y) = view.to_pixel(Point::new(20.0, 0.0));
        // pointer triangle sits 10 px above the anchor
        assert_ne!(img.get_pixel(x as u32, y as u32 - 10).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(x as u32 - 30, y as u32 - 10).0, [255, 255, 255]);
    }

    #[test]
    fn legend_lists_labelled_features() {
        let view = View::new(Point::new(0.0, 0.0), 1.0, 200, 200);
        let mut line = Feature::new(Geometry::LineString(LineString::new(vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 40.0),
        ])));
        line.id = Some(FeatureId(7));
        let outside = Feature::new(Geometry::LineString(LineString::new(vec![
            Point::new(5000.0, 5000.0),
            Point::new(5010.0, 5000.0),
        ])));
        let dot = Feature::new(Geometry::Point(Point::new(1.0, 1.0)));
        let features = [line, outside, dot];
        let legend = label_legend(&features, &view, &mut planar(), &StyleRequest::layer(false));
        assert_eq!(legend, vec!["7: 50 m".to_string()]);
    }

    #[test]
    fn empty_view_is_an_export_failure() {
        let view = View::new(Point::new(0.0, 0.0), 1.0, 0, 0);
        let request = StyleRequest::default();
        let bg = Color::rgba(0, 0, 0, 1.0);
        let err = rasterize(std::iter::empty(), &view, &mut planar(), &request, bg).unwrap_err();
        assert!(matches!(err, Error::ExportFailed(_)));
    }
}
