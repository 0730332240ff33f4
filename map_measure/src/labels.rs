//! Measurement labels for features being drawn, modified or stored.
//!
//! Styles are long lived and rewritten on every evaluation: the label text
//! and anchor change on each pointer move, the objects do not.

use std::borrow::Cow;

use crate::geometry::{Geometry, GeometryType, LineString, Point};
use crate::gis::Feature;
use crate::measure::Measurement;
use crate::styles::{
    default_base_style, default_label_style, default_modify_style, default_segment_style,
    default_tip_style, Style,
};

/// Growable pool of segment label styles cloned from a template.
///
/// The pool never shrinks. A shorter line simply uses fewer entries.
#[derive(Debug, Clone)]
pub struct LabelPool {
    template: Style,
    styles: Vec<Style>,
}

impl LabelPool {
    pub fn new(template: Style) -> Self {
        Self {
            styles: vec![template.clone()],
            template,
        }
    }

    /// Grows the pool to at least `n` entries and returns the first `n`.
    pub fn ensure_capacity(&mut self, n: usize) -> &mut [Style] {
        while self.styles.len() < n {
            self.styles.push(self.template.clone());
        }
        &mut self.styles[..n]
    }

    /// Number of allocated styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Style> {
        self.styles.get(index)
    }

    fn first(&self, n: usize) -> &[Style] {
        &self.styles[..n.min(self.styles.len())]
    }
}

/// Options for one style evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRequest<'a> {
    /// Label every segment with its own length.
    pub show_segments: bool,
    /// Only label features of this type.
    pub restrict_to: Option<GeometryType>,
    /// Hint shown at the sketch cursor.
    pub tip: Option<&'a str>,
    /// Whether the modify overlay currently holds no vertex.
    pub overlay_is_empty: bool,
}

impl Default for StyleRequest<'_> {
    fn default() -> Self {
        Self {
            show_segments: false,
            restrict_to: None,
            tip: None,
            overlay_is_empty: true,
        }
    }
}

impl<'a> StyleRequest<'a> {
    /// Request used by the layer holding committed features.
    pub fn layer(show_segments: bool) -> Self {
        Self {
            show_segments,
            ..Default::default()
        }
    }

    /// Request used by the draw tool for its sketch features.
    pub fn sketch(
        show_segments: bool,
        draw_type: GeometryType,
        tip: &'a str,
        overlay_is_empty: bool,
    ) -> Self {
        Self {
            show_segments,
            restrict_to: Some(draw_type),
            tip: Some(tip),
            overlay_is_empty,
        }
    }
}

/// Shared styles used by the measure tool.
#[derive(Debug, Clone)]
pub struct MeasureStyles {
    pub base: Style,
    pub label: Style,
    pub tip: Style,
    pub modify: Style,
    segments: LabelPool,
    measurement: Measurement,
    tip_point: Option<Point>,
}

impl Default for MeasureStyles {
    fn default() -> Self {
        Self::new(Measurement::default())
    }
}

impl MeasureStyles {
    pub fn new(measurement: Measurement) -> Self {
        Self {
            base: default_base_style(),
            label: default_label_style(),
            tip: default_tip_style(),
            modify: default_modify_style(),
            segments: LabelPool::new(default_segment_style()),
            measurement,
            tip_point: None,
        }
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    pub fn segment_pool(&self) -> &LabelPool {
        &self.segments
    }

    /// Last point the tip was shown at.
    pub fn tip_point(&self) -> Option<Point> {
        self.tip_point
    }

    /// Pins the modify hint at the last tip position.
    pub fn anchor_modify_at_tip(&mut self) {
        self.modify.set_geometry(self.tip_point);
    }

    /// Lets the modify hint follow the hovered vertex again.
    pub fn release_modify_anchor(&mut self) {
        self.modify.set_geometry(None);
    }

    /// Decides which labels apply to `feature` and updates their text.
    ///
    /// The result is ordered for drawing: base style, segment labels, the
    /// area or length label, then the tip.
    pub fn style_feature(
        &mut self,
        feature: &Feature,
        request: &StyleRequest<'_>,
    ) -> Vec<&Style> {
        let geometry = &feature.geometry;
        let measurement = self.measurement;

        let mut label: Option<(Point, String)> = None;
        let mut line: Option<Cow<'_, LineString>> = None;
        if request
            .restrict_to
            .map_or(true, |t| t == geometry.geometry_type())
        {
            match geometry {
                Geometry::Polygon(polygon) => {
                    label = Some((polygon.interior_point(), measurement.area_label(geometry)));
                    line = Some(Cow::Owned(polygon.outer_ring_line()));
                }
                Geometry::LineString(l) => {
                    label = l
                        .last_coordinate()
                        .map(|last| (last, measurement.length_label(geometry)));
                    line = Some(Cow::Borrowed(l));
                }
                Geometry::Point(_) | Geometry::Circle(_) => {}
            }
        }

        let mut segment_count = 0;
        if let (true, Some(line)) = (request.show_segments, line.as_deref()) {
            let segments: Vec<LineString> = line
                .segments()
                .map(|s| LineString::new(vec![s.start, s.end]))
                .collect();
            let pool = self.segments.ensure_capacity(segments.len());
            for (style, segment) in pool.iter_mut().zip(segments) {
                style.set_geometry(segment.coordinate_at(0.5));
                style.set_text(measurement.length_label(&Geometry::LineString(segment)));
            }
            segment_count = pool.len();
        }

        let has_label = label.is_some();
        if let Some((anchor, text)) = label {
            self.label.set_geometry(Some(anchor));
            self.label.set_text(text);
        }

        let mut has_tip = false;
        if let (Some(tip), Geometry::Point(p)) = (request.tip, geometry) {
            if request.overlay_is_empty {
                self.tip_point = Some(*p);
                self.tip.set_text(tip);
                has_tip = true;
            }
        }

        let mut styles = Vec::with_capacity(segment_count + 3);
        styles.push(&self.base);
        styles.extend(self.segments.first(segment_count));
        if has_label {
            styles.push(&self.label);
        }
        if has_tip {
            styles.push(&self.tip);
        }
        styles
    }
}
