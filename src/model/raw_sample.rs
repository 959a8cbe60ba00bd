use super::Channels;
use crate::error::{Result, ViewerError};

/// Intensity samples of one frame exactly as stored in the source file,
/// widened to `f32`. Colour samples are interleaved (R, G, B).
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    width: u32,
    height: u32,
    channels: Channels,
    samples: Vec<f32>,
}

impl RawSample {
    pub fn new(width: u32, height: u32, channels: Channels, samples: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize * channels.count();
        if width == 0 || height == 0 {
            return Err(ViewerError::InvalidSettings(format!(
                "sample grid must not be empty ({width}x{height})"
            )));
        }
        if samples.len() != expected {
            return Err(ViewerError::InvalidSettings(format!(
                "expected {expected} samples for a {width}x{height} {channels} grid, found {}",
                samples.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Smallest and largest sample across all channels.
    pub fn extrema(&self) -> (f32, f32) {
        self.samples
            .iter()
            .copied()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), value| {
                (min.min(value), max.max(value))
            })
    }
}
