//! Loads a series of DICOM files, normalizes their pixel data to 8 bits and
//! exports the series as an MP4 video or a single windowed frame as
//! PNG, JPEG or BMP.

pub mod app;
mod components;
pub mod config;
pub mod error;
mod image_pipeline;
pub mod message;
pub mod model;
pub mod pipeline;
pub mod session;
pub mod utils;
mod views;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use config::{BatchPolicy, ViewerConfig};
pub use error::{Result, ViewerError};
pub use session::{Request, Response, Session};
pub use workspace::{Upload, Workspace};
