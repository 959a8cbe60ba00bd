use std::path::PathBuf;

use crate::error::{Result, ViewerError};
use crate::model::ResizeFilter;

pub const DEFAULT_OUTPUT_SIZE: u32 = 512;
pub const DEFAULT_FRAME_RATE: f64 = 10.0;

/// What to do when one file of a batch cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Abort the whole batch with the file's error.
    #[default]
    FailFast,
    /// Log the file's error and continue with the rest.
    SkipAndWarn,
}

impl BatchPolicy {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "fail" | "fail-fast" | "failfast" => Some(Self::FailFast),
            "skip" | "skip-and-warn" | "skipandwarn" => Some(Self::SkipAndWarn),
            _ => None,
        }
    }
}

/// Settings handed explicitly to the session; nothing here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub output_width: u32,
    pub output_height: u32,
    pub frame_rate: f64,
    pub resize_filter: ResizeFilter,
    /// Cap on the number of files (in name order) put into a video.
    pub frame_limit: Option<usize>,
    pub batch_policy: BatchPolicy,
    pub ffmpeg_path: PathBuf,
    pub video_codec: String,
    /// Parent of per-upload workspaces; the system temp dir when `None`.
    pub workspace_root: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            output_width: DEFAULT_OUTPUT_SIZE,
            output_height: DEFAULT_OUTPUT_SIZE,
            frame_rate: DEFAULT_FRAME_RATE,
            resize_filter: ResizeFilter::default(),
            frame_limit: None,
            batch_policy: BatchPolicy::default(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            video_codec: String::from("libx264"),
            workspace_root: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies `DICOMOVIE_*` overrides on top of the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("DICOMOVIE_FFMPEG") {
            config.ffmpeg_path = PathBuf::from(path);
        }
        if let Some(codec) = lookup("DICOMOVIE_VIDEO_CODEC") {
            config.video_codec = codec;
        }
        if let Some(root) = lookup("DICOMOVIE_WORKSPACE") {
            config.workspace_root = Some(PathBuf::from(root));
        }
        if let Some(fps) = lookup("DICOMOVIE_FPS") {
            config.frame_rate = fps.trim().parse().map_err(|_| {
                ViewerError::InvalidSettings(format!("DICOMOVIE_FPS is not a number: `{fps}`"))
            })?;
        }
        if let Some(limit) = lookup("DICOMOVIE_FRAME_LIMIT") {
            config.frame_limit = Some(limit.trim().parse().map_err(|_| {
                ViewerError::InvalidSettings(format!(
                    "DICOMOVIE_FRAME_LIMIT is not a count: `{limit}`"
                ))
            })?);
        }
        if let Some(policy) = lookup("DICOMOVIE_BATCH_POLICY") {
            config.batch_policy = BatchPolicy::parse(&policy).ok_or_else(|| {
                ViewerError::InvalidSettings(format!("unknown batch policy `{policy}`"))
            })?;
        }
        if let Some(filter) = lookup("DICOMOVIE_RESIZE_FILTER") {
            config.resize_filter = ResizeFilter::parse(&filter).ok_or_else(|| {
                ViewerError::InvalidSettings(format!("unknown resize filter `{filter}`"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_width == 0 || self.output_height == 0 {
            return Err(ViewerError::InvalidSettings(format!(
                "output resolution {}x{} is empty",
                self.output_width, self.output_height
            )));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ViewerError::InvalidSettings(format!(
                "frame rate must be positive, got {}",
                self.frame_rate
            )));
        }
        Ok(())
    }
}
