//! Error type shared by the I/O and export paths.

/// Errors reported by fallible operations of this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("export failed: {0}")]
    ExportFailed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
