//! Tool configuration loaded from JSON.

use std::path::{Path, PathBuf};

use crate::draw::{DrawType, SessionOptions, ToolMode};
use crate::error::Result;
use crate::measure::Measurement;

/// Settings shared by the draw session and the PDF export.
///
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    pub mode: ToolMode,
    pub draw_type: DrawType,
    pub show_segments: bool,
    pub clear_previous: bool,
    pub measurement: Measurement,
    pub modify_tolerance: f64,
    /// Directory holding `<font_name>-Regular.ttf` and friends.
    pub font_dir: PathBuf,
    pub font_name: String,
    pub export_title: String,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            mode: ToolMode::Measure,
            draw_type: DrawType::Polygon,
            show_segments: false,
            clear_previous: false,
            measurement: Measurement::Spherical,
            modify_tolerance: 10.0,
            font_dir: PathBuf::from("assets"),
            font_name: "DejaVuSans".to_string(),
            export_title: "Map export".to_string(),
        }
    }
}

impl MeasureConfig {
    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            mode: self.mode,
            draw_type: self.draw_type,
            show_segments: self.show_segments,
            clear_previous: self.clear_previous,
            modify_tolerance: self.modify_tolerance,
        }
    }
}
