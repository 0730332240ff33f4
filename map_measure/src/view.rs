//! Map view: what part of the map is visible and at which resolution.

use crate::geometry::{Extent, Point};

/// Resolution of zoom level 0 in the Web Mercator tile grid.
const MAX_RESOLUTION: f64 = 156_543.033_928_040_97;

/// Visible map region in pixels and map units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub center: Point,
    /// Map units per pixel.
    pub resolution: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for View {
    fn default() -> Self {
        Self::from_zoom(Point::new(-11_000_000.0, 4_600_000.0), 4.0, 1024, 768)
    }
}

impl View {
    pub fn new(center: Point, resolution: f64, width: u32, height: u32) -> Self {
        Self {
            center,
            resolution,
            width,
            height,
        }
    }

    /// View at a Web Mercator zoom level.
    pub fn from_zoom(center: Point, zoom: f64, width: u32, height: u32) -> Self {
        Self::new(center, MAX_RESOLUTION / 2f64.powf(zoom), width, height)
    }

    /// Smallest view of the given pixel size that shows all of `extent`
    /// with `padding` pixels on every side.
    pub fn fit(extent: &Extent, width: u32, height: u32, padding: u32) -> Self {
        let usable_w = width.saturating_sub(2 * padding).max(1) as f64;
        let usable_h = height.saturating_sub(2 * padding).max(1) as f64;
        let mut resolution = (extent.width() / usable_w).max(extent.height() / usable_h);
        if !resolution.is_finite() || resolution <= 0.0 {
            resolution = 1.0;
        }
        let center = if extent.is_empty() {
            Point::default()
        } else {
            extent.center()
        };
        Self::new(center, resolution, width, height)
    }

    /// Map extent covered by the view.
    pub fn extent(&self) -> Extent {
        let half_w = self.width as f64 * self.resolution / 2.0;
        let half_h = self.height as f64 * self.resolution / 2.0;
        Extent::new(
            self.center.x - half_w,
            self.center.y - half_h,
            self.center.x + half_w,
            self.center.y + half_h,
        )
    }

    /// Pixel position of a map coordinate; y grows downwards.
    pub fn to_pixel(&self, p: Point) -> (f32, f32) {
        let extent = self.extent();
        (
            ((p.x - extent.min_x) / self.resolution) as f32,
            ((extent.max_y - p.y) / self.resolution) as f32,
        )
    }
}
