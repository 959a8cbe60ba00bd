use std::path::{Path, PathBuf};

use crate::config::{BatchPolicy, ViewerConfig};
use crate::error::Result;
use crate::model::{Metadata, NormalizedFrame};
use crate::pipeline::{normalize, read};

/// One video frame and the file it came from.
#[derive(Debug, Clone)]
pub struct SequencedFrame {
    pub name: String,
    pub metadata: Metadata,
    pub frame: NormalizedFrame,
}

/// Frames ordered by source file name, all RGB at one resolution.
#[derive(Debug, Clone, Default)]
pub struct FrameSet {
    frames: Vec<SequencedFrame>,
}

impl FrameSet {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SequencedFrame> {
        self.frames.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.frames.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Output resolution, or `None` for an empty set.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.frames
            .first()
            .map(|entry| (entry.frame.width(), entry.frame.height()))
    }
}

/// Reads, normalizes and resizes `files` in byte-wise file-name order.
///
/// Each frame is normalized against its own extrema, stretched to the
/// configured output size and converted to R, G, B. Acquisition time and
/// instance number are not consulted.
pub fn sequence(files: &[PathBuf], config: &ViewerConfig) -> Result<FrameSet> {
    let mut ordered: Vec<&PathBuf> = files.iter().collect();
    ordered.sort_by_cached_key(|path| file_name(path));

    let limit = config.frame_limit.unwrap_or(usize::MAX);
    let (width, height) = (config.output_width, config.output_height);
    let mut frames = Vec::with_capacity(ordered.len().min(limit));

    // The limit counts produced frames, so skipped files do not use it up.
    for path in ordered {
        if frames.len() >= limit {
            break;
        }
        match sequence_one(path, width, height, config) {
            Ok(entry) => frames.push(entry),
            Err(err) if config.batch_policy == BatchPolicy::SkipAndWarn && err.is_per_file() => {
                log::warn!("Skipping {}: {err}", path.display());
            }
            Err(err) => return Err(err),
        }
    }

    log::info!("Sequenced {} frame(s) at {width}x{height}", frames.len());
    Ok(FrameSet { frames })
}

fn sequence_one(path: &Path, width: u32, height: u32, config: &ViewerConfig) -> Result<SequencedFrame> {
    let (raw, metadata) = read(path)?;
    let frame = normalize(&raw, None, None)
        .resized(width, height, config.resize_filter)
        .to_rgb();

    Ok(SequencedFrame {
        name: file_name(path),
        metadata,
        frame,
    })
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl From<Vec<SequencedFrame>> for FrameSet {
    fn from(frames: Vec<SequencedFrame>) -> Self {
        Self { frames }
    }
}
