//! Core library for the map measure and shape drawing tools.

pub mod config;
pub mod draw;
pub mod error;
#[cfg(feature = "export")]
pub mod export;
pub mod geometry;
pub mod gis;
pub mod io;
pub mod labels;
pub mod measure;
pub mod select;
pub mod styles;
pub mod view;

pub use error::{Error, Result};
