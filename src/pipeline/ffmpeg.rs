use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::model::NormalizedFrame;
use crate::pipeline::VideoEncoder;

/// Pixel layout of the raw frames written to ffmpeg's stdin. Frames are
/// handed over in R, G, B order, so the input format must be `rgb24`
/// (not `bgr24`).
const INPUT_PIXEL_FORMAT: &str = "rgb24";
const OUTPUT_PIXEL_FORMAT: &str = "yuv420p";

/// Streams raw frames to the system `ffmpeg` binary, which muxes them into
/// an MP4 file at `output`.
///
/// The output path belongs to the caller; it is read back once encoding
/// finishes but never deleted here.
pub struct FfmpegEncoder {
    binary: PathBuf,
    codec: String,
    output: PathBuf,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    frame_len: usize,
}

impl FfmpegEncoder {
    pub fn new(binary: impl Into<PathBuf>, codec: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            codec: codec.into(),
            output: output.into(),
            child: None,
            stdin: None,
            frame_len: 0,
        }
    }

    pub fn from_config(config: &ViewerConfig, output: impl Into<PathBuf>) -> Self {
        Self::new(config.ffmpeg_path.clone(), config.video_codec.clone(), output)
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Whether `binary -version` runs successfully.
    pub fn is_available(binary: &Path) -> bool {
        Command::new(binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    fn command(&self, width: u32, height: u32, frame_rate: f64) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["-hide_banner", "-loglevel", "error", "-y"])
            .args(["-f", "rawvideo", "-pix_fmt", INPUT_PIXEL_FORMAT])
            .args(["-s", &format!("{width}x{height}")])
            .args(["-framerate", &frame_rate.to_string()])
            .args(["-i", "pipe:0", "-an"])
            .args(["-c:v", &self.codec, "-pix_fmt", OUTPUT_PIXEL_FORMAT])
            .args(["-movflags", "+faststart", "-f", "mp4"])
            .arg(&self.output);
        cmd
    }

    /// Waits for ffmpeg after a failure and folds its stderr into the error.
    fn failure(&mut self, what: &str) -> ViewerError {
        self.stdin = None;
        let mut detail = String::new();
        if let Some(mut child) = self.child.take() {
            if let Some(mut stderr) = child.stderr.take() {
                let _ = stderr.read_to_string(&mut detail);
            }
            let _ = child.wait();
        }
        let error = ViewerError::Encode(format!("{what}: {}", detail.trim()));
        log::error!("{error}");
        error
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn supported_resolution(&self, width: u32, height: u32) -> (u32, u32) {
        // 4:2:0 chroma subsampling needs even dimensions.
        (width & !1, height & !1)
    }

    fn begin(&mut self, width: u32, height: u32, frame_rate: f64) -> Result<()> {
        let mut command = self.command(width, height, frame_rate);
        log::debug!("Running {command:?}");

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| ViewerError::Encode(format!("failed to start {}: {err}", self.binary.display())))?;

        self.stdin = child.stdin.take();
        self.child = Some(child);
        self.frame_len = width as usize * height as usize * 3;
        Ok(())
    }

    fn encode_frame(&mut self, frame: &NormalizedFrame) -> Result<()> {
        let pixels = frame.pixels();
        if pixels.len() != self.frame_len {
            return Err(ViewerError::Encode(format!(
                "frame has {} bytes, encoder expects {}",
                pixels.len(),
                self.frame_len
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ViewerError::Encode(String::from("encoder was not started")));
        };
        if stdin.write_all(pixels).is_err() {
            return Err(self.failure("ffmpeg stopped accepting frames"));
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        // Closing stdin signals end of input.
        self.stdin = None;
        let Some(child) = self.child.take() else {
            return Err(ViewerError::Encode(String::from("encoder was not started")));
        };

        let output = child
            .wait_with_output()
            .map_err(|err| ViewerError::Encode(format!("waiting for ffmpeg: {err}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ViewerError::Encode(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        std::fs::read(&self.output)
            .map_err(|err| ViewerError::io(format!("reading {}", self.output.display()), err))
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        self.stdin = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Channels, Metadata};
    use crate::pipeline::{FrameSet, SequencedFrame, VideoExporter};
    use tempfile::TempDir;

    fn args(encoder: &FfmpegEncoder) -> Vec<String> {
        encoder
            .command(512, 512, 10.0)
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn command_reads_rgb_frames_from_stdin() {
        let encoder = FfmpegEncoder::new("ffmpeg", "libx264", "/tmp/out.mp4");
        let args = args(&encoder);

        let after = |flag: &str| {
            let position = args.iter().position(|arg| arg == flag).unwrap();
            args[position + 1].clone()
        };
        assert_eq!(after("-f"), "rawvideo");
        assert_eq!(after("-pix_fmt"), "rgb24");
        assert_eq!(after("-s"), "512x512");
        assert_eq!(after("-framerate"), "10");
        assert_eq!(after("-i"), "pipe:0");
        assert_eq!(after("-c:v"), "libx264");
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));
    }

    #[test]
    fn resolution_is_rounded_down_to_even() {
        let encoder = FfmpegEncoder::new("ffmpeg", "libx264", "out.mp4");
        assert_eq!(encoder.supported_resolution(513, 512), (512, 512));
    }

    #[test]
    fn missing_binary_fails_to_begin() {
        let mut encoder = FfmpegEncoder::new("/nonexistent/ffmpeg", "libx264", "out.mp4");
        assert!(!FfmpegEncoder::is_available(Path::new("/nonexistent/ffmpeg")));
        assert!(matches!(encoder.begin(2, 2, 10.0), Err(ViewerError::Encode(_))));
    }

    #[test]
    fn finish_without_begin_is_an_error() {
        let mut encoder = FfmpegEncoder::new("ffmpeg", "libx264", "out.mp4");
        assert!(matches!(encoder.finish(), Err(ViewerError::Encode(_))));
    }

    fn probe_frame_count(path: &Path) -> Option<usize> {
        let output = Command::new("ffprobe")
            .args(["-v", "error", "-select_streams", "v:0", "-count_frames"])
            .args(["-show_entries", "stream=nb_read_frames"])
            .args(["-of", "default=nokey=1:noprint_wrappers=1"])
            .arg(path)
            .output()
            .ok()?;
        String::from_utf8_lossy(&output.stdout).trim().parse().ok()
    }

    #[test]
    fn encodes_mp4_with_system_ffmpeg() {
        if !FfmpegEncoder::is_available(Path::new("ffmpeg")) {
            eprintln!("ffmpeg not on PATH, skipping");
            return;
        }

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("clip.mp4");
        let frames: Vec<SequencedFrame> = [10u8, 128, 250]
            .iter()
            .enumerate()
            .map(|(i, &value)| SequencedFrame {
                name: format!("{i:02}.dcm"),
                metadata: Metadata::default(),
                frame: NormalizedFrame::from_pixels(64, 64, Channels::Gray, vec![value; 64 * 64]).unwrap(),
            })
            .collect();

        let mut exporter = VideoExporter::new(FfmpegEncoder::new("ffmpeg", "libx264", &output));
        let artifact = match exporter.export(&FrameSet::from(frames), 10.0, (64, 64)) {
            Ok(artifact) => artifact,
            // Some ffmpeg builds ship without libx264.
            Err(ViewerError::Encode(message)) => {
                eprintln!("ffmpeg could not encode, skipping: {message}");
                return;
            }
            Err(other) => panic!("unexpected error: {other}"),
        };

        assert!(!artifact.bytes.is_empty());
        assert_eq!(&artifact.bytes[4..8], b"ftyp");
        if let Some(count) = probe_frame_count(&output) {
            assert_eq!(count, 3);
        }
    }
}
