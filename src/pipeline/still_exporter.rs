use std::fmt;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};

use crate::error::{Result, ViewerError};
use crate::model::NormalizedFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StillFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl StillFormat {
    pub const ALL: [StillFormat; 3] = [StillFormat::Png, StillFormat::Jpeg, StillFormat::Bmp];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Bmp => "image/bmp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for StillFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Jpeg => write!(f, "JPEG"),
            Self::Bmp => write!(f, "BMP"),
        }
    }
}

/// Display window over 0-255 values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub min: i32,
    pub max: i32,
}

impl Window {
    pub const FULL: Window = Window { min: 0, max: 255 };

    pub fn new(min: i32, max: i32) -> Result<Self> {
        let window = Self { min, max };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |value: i32| (0..=255).contains(&value);
        if self.max <= self.min || !in_range(self.min) || !in_range(self.max) {
            return Err(ViewerError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Clips `value` into the window and stretches the window to 0-255,
    /// truncating.
    fn apply(&self, value: u8) -> u8 {
        let clipped = i32::from(value).clamp(self.min, self.max);
        ((clipped - self.min) * 255 / (self.max - self.min)) as u8
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::FULL
    }
}

/// Second, display-only windowing pass over an already normalized frame.
pub fn apply_window(frame: &NormalizedFrame, window: Window) -> Result<NormalizedFrame> {
    window.validate()?;

    let image = match frame.image() {
        DynamicImage::ImageLuma8(gray) => {
            DynamicImage::ImageLuma8(GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
                Luma([window.apply(gray.get_pixel(x, y)[0])])
            }))
        }
        other => {
            let rgb = other.to_rgb8();
            DynamicImage::ImageRgb8(RgbImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                Rgb([window.apply(r), window.apply(g), window.apply(b)])
            }))
        }
    };

    Ok(NormalizedFrame::from_image(image))
}

#[derive(Debug, Clone)]
pub struct StillArtifact {
    pub bytes: Vec<u8>,
    pub format: StillFormat,
    pub file_name: String,
}

impl StillArtifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

pub struct StillExporter;

impl StillExporter {
    /// Windows `frame` and encodes it. The artifact is named after the source
    /// file with the format's extension appended (`02.dcm` → `02.dcm.png`).
    pub fn export(
        frame: &NormalizedFrame,
        source_name: &str,
        window_min: i32,
        window_max: i32,
        format: StillFormat,
    ) -> Result<StillArtifact> {
        let windowed = apply_window(frame, Window::new(window_min, window_max)?)?;

        let mut bytes = Cursor::new(Vec::new());
        windowed
            .image()
            .write_to(&mut bytes, format.image_format())
            .map_err(|err| ViewerError::Encode(format!("{format} encoding failed: {err}")))?;

        let file_name = format!("{source_name}.{}", format.extension());
        log::info!("Exported {file_name} with window [{window_min}, {window_max}]");

        Ok(StillArtifact {
            bytes: bytes.into_inner(),
            format,
            file_name,
        })
    }

    /// Exports and writes the encoded bytes to `path`.
    pub fn export_to_path(
        frame: &NormalizedFrame,
        window_min: i32,
        window_max: i32,
        format: StillFormat,
        path: &Path,
    ) -> Result<StillArtifact> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut artifact = Self::export(frame, &file_name, window_min, window_max, format)?;
        std::fs::write(path, &artifact.bytes)
            .map_err(|err| ViewerError::io(format!("writing {}", path.display()), err))?;

        // Report the name the bytes were actually written under.
        artifact.file_name = file_name;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Channels;
    use tempfile::TempDir;

    fn ramp() -> NormalizedFrame {
        NormalizedFrame::from_pixels(4, 1, Channels::Gray, vec![0, 50, 100, 255]).unwrap()
    }

    #[test]
    fn inverted_window_is_rejected() {
        let result = StillExporter::export(&ramp(), "a.dcm", 200, 50, StillFormat::Png);
        assert!(matches!(
            result,
            Err(ViewerError::InvalidRange { min: 200, max: 50 })
        ));
    }

    #[test]
    fn empty_or_out_of_range_windows_are_rejected() {
        assert!(Window::new(80, 80).is_err());
        assert!(Window::new(-1, 100).is_err());
        assert!(Window::new(0, 256).is_err());
        assert!(Window::new(0, 255).is_ok());
    }

    #[test]
    fn full_window_is_identity() {
        let frame = ramp();
        assert_eq!(apply_window(&frame, Window::FULL).unwrap(), frame);
    }

    #[test]
    fn narrow_window_clips_and_stretches() {
        let windowed = apply_window(&ramp(), Window::new(50, 100).unwrap()).unwrap();
        assert_eq!(windowed.pixels(), &[0, 0, 255, 255]);

        let windowed = apply_window(&ramp(), Window::new(0, 200).unwrap()).unwrap();
        // 50 * 255 / 200 = 63.75, truncated.
        assert_eq!(windowed.pixels(), &[0, 63, 127, 255]);
    }

    #[test]
    fn encodes_each_format() {
        let frame = ramp();
        let png = StillExporter::export(&frame, "02.dcm", 0, 255, StillFormat::Png).unwrap();
        let jpeg = StillExporter::export(&frame, "02.dcm", 0, 255, StillFormat::Jpeg).unwrap();
        let bmp = StillExporter::export(&frame, "02.dcm", 0, 255, StillFormat::Bmp).unwrap();

        assert_eq!(&png.bytes[..4], b"\x89PNG");
        assert_eq!(&jpeg.bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(&bmp.bytes[..2], b"BM");

        assert_eq!(png.file_name, "02.dcm.png");
        assert_eq!(jpeg.file_name, "02.dcm.jpg");
        assert_eq!(bmp.mime_type(), "image/bmp");
    }

    #[test]
    fn png_round_trips_the_windowed_pixels() {
        let artifact = StillExporter::export(&ramp(), "x.dcm", 50, 100, StillFormat::Png).unwrap();
        let decoded = image::load_from_memory(&artifact.bytes).unwrap().to_luma8();
        assert_eq!(decoded.into_raw(), vec![0, 0, 255, 255]);
    }

    #[test]
    fn writes_to_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slice.bmp");

        let artifact =
            StillExporter::export_to_path(&ramp(), 0, 255, StillFormat::Bmp, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
        assert_eq!(artifact.file_name, "slice.bmp");
    }

    #[test]
    fn path_name_is_reported_even_when_extension_differs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.jpg");

        let artifact =
            StillExporter::export_to_path(&ramp(), 0, 255, StillFormat::Png, &path).unwrap();
        assert_eq!(artifact.file_name, "x.jpg");
        assert_eq!(artifact.format, StillFormat::Png);
        assert!(std::fs::read(&path).unwrap().starts_with(b"\x89PNG"));
    }
}
