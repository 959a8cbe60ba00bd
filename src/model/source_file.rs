use super::{AttributeRow, Metadata, NormalizedFrame};
use std::path::PathBuf;

/// A staged upload together with everything the viewer shows for it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
    pub metadata: Metadata,
    pub attributes: Vec<AttributeRow>,
    /// Normalized against the file's own extrema.
    pub frame: NormalizedFrame,
}
