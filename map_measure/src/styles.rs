//! Basic styling structures for drawn features and their labels.

use crate::geometry::Point;

/// RGBA color with straight alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Alpha scaled to a byte.
    pub fn alpha_u8(&self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Fill definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
}

impl Fill {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

/// Stroke definition. An empty dash pattern draws a solid line.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub line_dash: Vec<f32>,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            line_dash: Vec::new(),
        }
    }

    pub fn dashed(mut self, dash: &[f32]) -> Self {
        self.line_dash = dash.to_vec();
        self
    }
}

/// Horizontal anchoring of label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical anchoring of label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Text label definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub text: Option<String>,
    pub font: String,
    pub fill: Fill,
    pub background_fill: Option<Fill>,
    pub padding: [f32; 4],
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub offset: [f32; 2],
}

impl TextStyle {
    /// Creates a new text style with white text.
    pub fn new(font: &str) -> Self {
        Self {
            text: None,
            font: font.to_string(),
            fill: Fill::new(Color::rgba(255, 255, 255, 1.0)),
            background_fill: None,
            padding: [0.0; 4],
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
            offset: [0.0, 0.0],
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}

/// Marker drawn at point geometries or label anchors.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageStyle {
    Circle {
        radius: f32,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
    },
    RegularShape {
        points: u32,
        radius: f32,
        angle: f32,
        displacement: [f32; 2],
        fill: Option<Fill>,
    },
}

/// Complete style applied to a feature during one render pass.
///
/// `geometry` overrides where the style is drawn; `None` draws at the
/// feature's own geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
    pub image: Option<ImageStyle>,
    pub text: Option<TextStyle>,
    pub geometry: Option<Point>,
}

impl Style {
    pub fn set_geometry(&mut self, anchor: Option<Point>) {
        self.geometry = anchor;
    }

    /// Returns the label text, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_ref().and_then(|t| t.text.as_deref())
    }

    /// Replaces the label text, creating a text style when missing.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text
            .get_or_insert_with(|| TextStyle::new(LABEL_FONT))
            .set_text(text);
    }
}

const LABEL_FONT: &str = "14px Calibri,sans-serif";
const SMALL_FONT: &str = "12px Calibri,sans-serif";

/// Dashed outline used for drawn and committed features.
pub fn default_base_style() -> Style {
    Style {
        fill: Some(Fill::new(Color::rgba(255, 255, 255, 0.2))),
        stroke: Some(Stroke::new(Color::rgba(0, 0, 0, 0.5), 2.0).dashed(&[10.0, 10.0])),
        image: Some(ImageStyle::Circle {
            radius: 5.0,
            fill: Some(Fill::new(Color::rgba(255, 255, 255, 0.2))),
            stroke: Some(Stroke::new(Color::rgba(0, 0, 0, 0.7), 1.25)),
        }),
        ..Default::default()
    }
}

/// Area or length label with a downward pointer.
pub fn default_label_style() -> Style {
    let mut text = TextStyle::new(LABEL_FONT);
    text.background_fill = Some(Fill::new(Color::rgba(0, 0, 0, 0.7)));
    text.padding = [3.0; 4];
    text.baseline = TextBaseline::Bottom;
    text.offset = [0.0, -15.0];
    Style {
        text: Some(text),
        image: Some(ImageStyle::RegularShape {
            points: 3,
            radius: 8.0,
            angle: std::f32::consts::PI,
            displacement: [0.0, 10.0],
            fill: Some(Fill::new(Color::rgba(0, 0, 0, 0.7))),
        }),
        ..Default::default()
    }
}

/// Hint shown next to the cursor while drawing.
pub fn default_tip_style() -> Style {
    let mut text = TextStyle::new(SMALL_FONT);
    text.background_fill = Some(Fill::new(Color::rgba(0, 0, 0, 0.4)));
    text.padding = [2.0; 4];
    text.align = TextAlign::Left;
    text.offset = [15.0, 0.0];
    Style {
        text: Some(text),
        ..Default::default()
    }
}

/// Vertex marker shown by the modify tool.
pub fn default_modify_style() -> Style {
    let mut text = TextStyle::new(SMALL_FONT);
    text.set_text("Drag to modify");
    text.background_fill = Some(Fill::new(Color::rgba(0, 0, 0, 0.7)));
    text.padding = [2.0; 4];
    text.align = TextAlign::Left;
    text.offset = [15.0, 0.0];
    Style {
        text: Some(text),
        image: Some(ImageStyle::Circle {
            radius: 5.0,
            fill: Some(Fill::new(Color::rgba(0, 0, 0, 0.4))),
            stroke: Some(Stroke::new(Color::rgba(0, 0, 0, 0.7), 1.25)),
        }),
        ..Default::default()
    }
}

/// Template cloned for every per-segment length label.
pub fn default_segment_style() -> Style {
    let mut text = TextStyle::new(SMALL_FONT);
    text.background_fill = Some(Fill::new(Color::rgba(0, 0, 0, 0.4)));
    text.padding = [2.0; 4];
    text.baseline = TextBaseline::Bottom;
    text.offset = [0.0, -12.0];
    Style {
        text: Some(text),
        image: Some(ImageStyle::RegularShape {
            points: 3,
            radius: 6.0,
            angle: std::f32::consts::PI,
            displacement: [0.0, 8.0],
            fill: Some(Fill::new(Color::rgba(0, 0, 0, 0.4))),
        }),
        ..Default::default()
    }
}
