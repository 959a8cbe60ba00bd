pub mod ffmpeg;
pub mod normalizer;
pub mod reader;
pub mod sequencer;
pub mod still_exporter;
pub mod video_exporter;

pub use ffmpeg::FfmpegEncoder;
pub use normalizer::normalize;
pub use reader::{read, read_with_attributes, has_dicom_extension};
pub use sequencer::{sequence, FrameSet, SequencedFrame};
pub use still_exporter::{apply_window, StillArtifact, StillExporter, StillFormat, Window};
pub use video_exporter::{VideoArtifact, VideoEncoder, VideoExporter};
