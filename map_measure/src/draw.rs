//! Draw tool: gesture handling, sketch geometry and the tip state machine.
//!
//! Pointer events from the host map are fed into [`DrawSession::handle`].
//! The session keeps the sketch, commits finished features into its
//! [`VectorSource`] and drives the label styles.

use log::{debug, info};

use crate::geometry::square::{regular_polygon, GeometryFunction};
use crate::geometry::{Geometry, GeometryType, LineString, Point, Polygon};
use crate::gis::{Feature, FeatureId, VectorSource};
use crate::labels::{MeasureStyles, StyleRequest};
use crate::select::select_intersecting;
use crate::styles::Style;

/// Tip shown before the first click.
pub const IDLE_TIP: &str = "Click to start measuring";

/// Shape the draw tool produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum DrawType {
    Point,
    LineString,
    #[default]
    Polygon,
    Circle,
    Square,
    /// Drawing disabled.
    None,
}

impl DrawType {
    /// Type of the geometry this draw type commits.
    pub fn geometry_type(&self) -> Option<GeometryType> {
        match self {
            DrawType::Point => Some(GeometryType::Point),
            DrawType::LineString => Some(GeometryType::LineString),
            DrawType::Polygon | DrawType::Square => Some(GeometryType::Polygon),
            DrawType::Circle => Some(GeometryType::Circle),
            DrawType::None => None,
        }
    }

    fn geometry_function(&self) -> Option<GeometryFunction> {
        match self {
            DrawType::Circle => Some(GeometryFunction::Circle),
            DrawType::Square => Some(GeometryFunction::Square),
            _ => None,
        }
    }

    /// Tip shown while a gesture is in progress.
    pub fn active_tip(&self) -> &'static str {
        match self {
            DrawType::Polygon => "Click to continue drawing the polygon",
            _ => "Click to continue drawing the line",
        }
    }
}

impl std::str::FromStr for DrawType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "point" => Ok(DrawType::Point),
            "linestring" | "line" => Ok(DrawType::LineString),
            "polygon" => Ok(DrawType::Polygon),
            "circle" => Ok(DrawType::Circle),
            "square" => Ok(DrawType::Square),
            "none" => Ok(DrawType::None),
            other => Err(format!("unknown draw type '{other}'")),
        }
    }
}

/// Which tool the session acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Labels lengths and areas, shows drawing tips.
    #[default]
    Measure,
    /// Plain shapes; selects intersecting features after each draw.
    Shape,
}

/// Phase of the draw gesture as far as the tip is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TipState {
    #[default]
    Idle,
    Drawing,
    Committed,
}

/// Gesture milestones reported by the draw tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipEvent {
    DrawStart,
    DrawEnd,
    PointerMove,
    Reset,
}

/// Computes the next tip state and the tip text to show.
pub fn transition(
    state: TipState,
    event: TipEvent,
    draw_type: DrawType,
) -> (TipState, &'static str) {
    let next = match (state, event) {
        (_, TipEvent::DrawStart) => TipState::Drawing,
        (TipState::Drawing, TipEvent::DrawEnd) => TipState::Committed,
        (TipState::Committed, TipEvent::PointerMove) => TipState::Idle,
        (_, TipEvent::Reset) => TipState::Idle,
        (s, _) => s,
    };
    let tip = match next {
        TipState::Drawing => draw_type.active_tip(),
        TipState::Idle | TipState::Committed => IDLE_TIP,
    };
    (next, tip)
}

/// Pointer and control input for the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawEvent {
    /// Single click at a map coordinate.
    Click(Point),
    PointerMove(Point),
    /// Double click or enter: finish a line or polygon.
    Finish,
    /// The user picked another shape type.
    TypeChanged(DrawType),
    /// Escape: drop the current sketch.
    Abort,
}

/// Vertex highlight of the modify tool.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModifyOverlay {
    pub active: bool,
    pub vertex: Option<Point>,
}

impl ModifyOverlay {
    pub fn is_empty(&self) -> bool {
        self.vertex.is_none()
    }
}

#[derive(Debug, Clone)]
struct Sketch {
    vertices: Vec<Point>,
    geometry: Geometry,
}

/// Options used to build a [`DrawSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub mode: ToolMode,
    pub draw_type: DrawType,
    pub show_segments: bool,
    pub clear_previous: bool,
    /// Distance in map units within which a vertex is picked for modify.
    pub modify_tolerance: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mode: ToolMode::Measure,
            draw_type: DrawType::Polygon,
            show_segments: false,
            clear_previous: false,
            modify_tolerance: 10.0,
        }
    }
}

/// Single-threaded draw and modify session over one vector source.
#[derive(Debug)]
pub struct DrawSession {
    options: SessionOptions,
    state: TipState,
    tip: &'static str,
    source: VectorSource,
    styles: MeasureStyles,
    sketch: Option<Sketch>,
    cursor: Option<Point>,
    modify: ModifyOverlay,
    selection: Vec<FeatureId>,
}

impl DrawSession {
    pub fn new(options: SessionOptions, styles: MeasureStyles) -> Self {
        Self {
            options,
            state: TipState::Idle,
            tip: IDLE_TIP,
            source: VectorSource::new(),
            styles,
            sketch: None,
            cursor: None,
            modify: ModifyOverlay {
                active: true,
                vertex: None,
            },
            selection: Vec::new(),
        }
    }

    pub fn source(&self) -> &VectorSource {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut VectorSource {
        &mut self.source
    }

    pub fn styles(&self) -> &MeasureStyles {
        &self.styles
    }

    pub fn state(&self) -> TipState {
        self.state
    }

    pub fn tip(&self) -> &'static str {
        self.tip
    }

    pub fn draw_type(&self) -> DrawType {
        self.options.draw_type
    }

    pub fn modify(&self) -> ModifyOverlay {
        self.modify
    }

    /// Features selected after the last completed draw.
    pub fn selection(&self) -> &[FeatureId] {
        &self.selection
    }

    /// Geometry of the gesture in progress.
    pub fn sketch_geometry(&self) -> Option<&Geometry> {
        self.sketch.as_ref().map(|s| &s.geometry)
    }

    pub fn set_show_segments(&mut self, show: bool) {
        self.options.show_segments = show;
    }

    pub fn set_clear_previous(&mut self, clear: bool) {
        self.options.clear_previous = clear;
    }

    /// Feeds one event into the session. Returns the id of a feature
    /// committed by this event.
    pub fn handle(&mut self, event: DrawEvent) -> Option<FeatureId> {
        match event {
            DrawEvent::PointerMove(p) => {
                self.cursor = Some(p);
                if self.state == TipState::Committed {
                    self.apply(TipEvent::PointerMove);
                    self.styles.release_modify_anchor();
                }
                if self.sketch.is_some() {
                    self.refresh_sketch();
                } else {
                    self.update_modify_overlay(p);
                }
                None
            }
            DrawEvent::Click(p) => self.click(p),
            DrawEvent::Finish => {
                let ready = match (&self.sketch, self.options.draw_type) {
                    (Some(s), DrawType::LineString) => s.vertices.len() >= 2,
                    (Some(s), DrawType::Polygon) => s.vertices.len() >= 3,
                    _ => false,
                };
                if ready {
                    self.finish()
                } else {
                    None
                }
            }
            DrawEvent::TypeChanged(draw_type) => {
                debug!("draw type changed to {draw_type:?}");
                self.options.draw_type = draw_type;
                self.reset();
                None
            }
            DrawEvent::Abort => {
                self.reset();
                None
            }
        }
    }

    fn click(&mut self, p: Point) -> Option<FeatureId> {
        let draw_type = self.options.draw_type;
        if draw_type == DrawType::None {
            return None;
        }
        self.cursor = Some(p);
        let Some(sketch) = self.sketch.as_mut() else {
            self.start(p);
            return if draw_type == DrawType::Point {
                self.finish()
            } else {
                None
            };
        };
        sketch.vertices.push(p);
        if draw_type.geometry_function().is_some() {
            return self.finish();
        }
        self.refresh_sketch();
        None
    }

    fn start(&mut self, p: Point) {
        debug!("draw start at {:.3},{:.3}", p.x, p.y);
        if self.options.clear_previous {
            self.source.clear();
        }
        self.modify = ModifyOverlay {
            active: false,
            vertex: None,
        };
        self.selection.clear();
        self.sketch = Some(Sketch {
            vertices: vec![p],
            geometry: Geometry::Point(p),
        });
        self.refresh_sketch();
        self.apply(TipEvent::DrawStart);
    }

    fn finish(&mut self) -> Option<FeatureId> {
        let sketch = self.sketch.take()?;
        let geometry = build_geometry(
            self.options.draw_type,
            &sketch.vertices,
            None,
            sketch.geometry,
        );
        let id = self.source.add(Feature::new(geometry));
        info!("committed feature {id} ({:?})", self.options.draw_type);

        self.styles.anchor_modify_at_tip();
        self.modify.active = true;
        self.apply(TipEvent::DrawEnd);

        if self.options.mode == ToolMode::Shape {
            if let Some(feature) = self.source.get(id) {
                self.selection = select_intersecting(&self.source, &feature.geometry, Some(id));
                info!("selected {} feature(s)", self.selection.len());
            }
        }
        Some(id)
    }

    fn reset(&mut self) {
        self.sketch = None;
        self.modify.active = true;
        self.apply(TipEvent::Reset);
    }

    fn apply(&mut self, event: TipEvent) {
        let (state, tip) = transition(self.state, event, self.options.draw_type);
        self.state = state;
        self.tip = tip;
    }

    fn refresh_sketch(&mut self) {
        let draw_type = self.options.draw_type;
        let cursor = self.cursor;
        if let Some(sketch) = self.sketch.as_mut() {
            let placeholder = Geometry::Point(Point::default());
            let previous = std::mem::replace(&mut sketch.geometry, placeholder);
            sketch.geometry = build_geometry(draw_type, &sketch.vertices, cursor, previous);
        }
    }

    fn update_modify_overlay(&mut self, p: Point) {
        if !self.modify.active {
            self.modify.vertex = None;
            return;
        }
        let mut best = None;
        let mut best_dist = self.options.modify_tolerance;
        for feature in self.source.iter() {
            for v in feature.geometry.vertices() {
                let d = p.distance_to(v);
                if d <= best_dist {
                    best_dist = d;
                    best = Some(v);
                }
            }
        }
        self.modify.vertex = best;
    }

    fn sketch_features(&self) -> Vec<Feature> {
        let mut features = Vec::new();
        if let Some(sketch) = &self.sketch {
            features.push(Feature::new(sketch.geometry.clone()));
        }
        if let (Some(cursor), true) = (self.cursor, self.options.draw_type != DrawType::None) {
            features.push(Feature::new(Geometry::Point(cursor)));
        }
        features
    }

    /// Styles every sketch feature (the shape and the cursor point).
    pub fn for_each_sketch_style(&mut self, mut f: impl FnMut(&Feature, &[&Style])) {
        let features = self.sketch_features();
        if self.options.mode == ToolMode::Shape {
            for feature in &features {
                f(feature, &[&self.styles.base]);
            }
            return;
        }
        let Some(geometry_type) = self.options.draw_type.geometry_type() else {
            return;
        };
        let request = StyleRequest::sketch(
            self.options.show_segments,
            geometry_type,
            self.tip,
            self.modify.is_empty(),
        );
        for feature in &features {
            let styles = self.styles.style_feature(feature, &request);
            f(feature, &styles);
        }
    }

    /// Styles every committed feature of the source.
    pub fn for_each_feature_style(&mut self, mut f: impl FnMut(&Feature, &[&Style])) {
        if self.options.mode == ToolMode::Shape {
            for feature in self.source.iter() {
                f(feature, &[&self.styles.base]);
            }
            return;
        }
        let request = StyleRequest::layer(self.options.show_segments);
        for feature in self.source.iter() {
            let styles = self.styles.style_feature(feature, &request);
            f(feature, &styles);
        }
    }

    /// Label texts of every committed feature, in draw order.
    pub fn feature_labels(&mut self) -> Vec<(FeatureId, Vec<String>)> {
        let mut out = Vec::new();
        self.for_each_feature_style(|feature, styles| {
            let texts: Vec<String> = styles
                .iter()
                .filter_map(|s| s.text().map(str::to_string))
                .collect();
            if let Some(id) = feature.id {
                out.push((id, texts));
            }
        });
        out
    }

    /// Modify hint style when the overlay shows a vertex or it is pinned.
    pub fn modify_style(&self) -> Option<&Style> {
        let shown = self.modify.vertex.is_some() || self.styles.modify.geometry.is_some();
        (self.modify.active && shown).then_some(&self.styles.modify)
    }
}

/// Turns the clicked vertices (plus the live cursor) into sketch geometry.
///
/// `previous` is reused for shapes built by a geometry function so the
/// in-progress polygon is rewritten rather than reallocated.
fn build_geometry(
    draw_type: DrawType,
    vertices: &[Point],
    cursor: Option<Point>,
    previous: Geometry,
) -> Geometry {
    let Some(&first) = vertices.first() else {
        return previous;
    };
    let mut coords = vertices.to_vec();
    if let Some(c) = cursor {
        if coords.last() != Some(&c) {
            coords.push(c);
        }
    }
    match draw_type {
        DrawType::Point | DrawType::None => Geometry::Point(first),
        DrawType::LineString => Geometry::LineString(LineString::new(coords)),
        DrawType::Polygon => Geometry::Polygon(Polygon::from_ring(coords)),
        DrawType::Circle | DrawType::Square => {
            let edge = vertices.get(1).copied().or(cursor).unwrap_or(first);
            let sides = draw_type.geometry_function().and_then(|f| f.sides());
            match (sides, previous) {
                (None, _) => Geometry::Circle(GeometryFunction::circle(first, edge)),
                (Some(sides), Geometry::Polygon(mut polygon)) => {
                    regular_polygon(first, edge, sides, Some(&mut polygon));
                    Geometry::Polygon(polygon)
                }
                (Some(sides), _) => {
                    Geometry::Polygon(regular_polygon(first, edge, sides, None).into_owned())
                }
            }
        }
    }
}
