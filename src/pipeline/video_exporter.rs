use crate::error::{Result, ViewerError};
use crate::model::{NormalizedFrame, ResizeFilter};
use crate::pipeline::FrameSet;

pub const VIDEO_FILE_NAME: &str = "dicom_video.mp4";
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

/// Receives frames in presentation order and produces the encoded stream.
///
/// Every frame passed to `encode_frame` is R, G, B at the resolution given
/// to `begin`.
pub trait VideoEncoder {
    /// Resolution the encoder can actually produce for a requested one.
    fn supported_resolution(&self, width: u32, height: u32) -> (u32, u32) {
        (width, height)
    }

    fn begin(&mut self, width: u32, height: u32, frame_rate: f64) -> Result<()>;

    fn encode_frame(&mut self, frame: &NormalizedFrame) -> Result<()>;

    fn finish(&mut self) -> Result<Vec<u8>>;
}

impl<E: VideoEncoder + ?Sized> VideoEncoder for &mut E {
    fn supported_resolution(&self, width: u32, height: u32) -> (u32, u32) {
        (**self).supported_resolution(width, height)
    }

    fn begin(&mut self, width: u32, height: u32, frame_rate: f64) -> Result<()> {
        (**self).begin(width, height, frame_rate)
    }

    fn encode_frame(&mut self, frame: &NormalizedFrame) -> Result<()> {
        (**self).encode_frame(frame)
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        (**self).finish()
    }
}

#[derive(Debug, Clone)]
pub struct VideoArtifact {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub frame_count: usize,
}

impl VideoArtifact {
    pub fn file_name(&self) -> &'static str {
        VIDEO_FILE_NAME
    }

    pub fn mime_type(&self) -> &'static str {
        VIDEO_MIME_TYPE
    }
}

pub struct VideoExporter<E> {
    encoder: E,
}

impl<E: VideoEncoder> VideoExporter<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn export(
        &mut self,
        frames: &FrameSet,
        frame_rate: f64,
        resolution: (u32, u32),
    ) -> Result<VideoArtifact> {
        if frames.is_empty() {
            return Err(ViewerError::EmptyInput);
        }
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(ViewerError::InvalidSettings(format!(
                "frame rate must be positive, got {frame_rate}"
            )));
        }

        let (width, height) = self.encoder.supported_resolution(resolution.0, resolution.1);
        if width == 0 || height == 0 {
            return Err(ViewerError::InvalidSettings(format!(
                "resolution {}x{} cannot be encoded",
                resolution.0, resolution.1
            )));
        }

        log::info!(
            "Exporting {} frame(s) at {width}x{height}, {frame_rate} fps",
            frames.len()
        );
        self.encoder.begin(width, height, frame_rate)?;

        for entry in frames.iter() {
            let frame = entry
                .frame
                .resized(width, height, ResizeFilter::default())
                .to_rgb();
            self.encoder.encode_frame(&frame)?;
        }

        let bytes = self.encoder.finish()?;
        log::info!("Encoded {VIDEO_FILE_NAME} ({} bytes)", bytes.len());

        Ok(VideoArtifact {
            bytes,
            width,
            height,
            frame_rate,
            frame_count: frames.len(),
        })
    }
}
