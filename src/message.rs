use std::path::PathBuf;

use crate::pipeline::StillFormat;
use crate::workspace::Upload;

#[derive(Debug, Clone)]
pub enum Message {
    PickFiles,
    FilesPicked(Vec<Upload>),
    SelectFile(String),
    WindowMinChanged(u8),
    WindowMaxChanged(u8),
    SetStillFormat(StillFormat),
    SaveStill,
    SaveVideo,
    /// `Ok(None)` when the save dialog was cancelled.
    Saved(Result<Option<PathBuf>, String>),
}
