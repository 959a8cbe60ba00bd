use std::fmt;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::{Result, ViewerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Gray,
    Rgb,
}

impl Channels {
    pub fn count(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
        }
    }
}

impl fmt::Display for Channels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gray => write!(f, "grayscale"),
            Self::Rgb => write!(f, "RGB"),
        }
    }
}

/// Interpolation used when a frame is stretched to the output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeFilter {
    Nearest,
    /// Linear interpolation.
    #[default]
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl ResizeFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
            Self::Bicubic => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "nearest" => Some(Self::Nearest),
            "bilinear" | "linear" => Some(Self::Bilinear),
            "bicubic" => Some(Self::Bicubic),
            "lanczos3" => Some(Self::Lanczos3),
            _ => None,
        }
    }
}

/// An 8-bit frame, either one gray channel or interleaved R, G, B.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFrame {
    image: DynamicImage,
}

impl NormalizedFrame {
    pub fn from_pixels(width: u32, height: u32, channels: Channels, pixels: Vec<u8>) -> Result<Self> {
        let len = pixels.len();
        let image = match channels {
            Channels::Gray => GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
            Channels::Rgb => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
        };

        image.map(|image| Self { image }).ok_or_else(|| {
            ViewerError::InvalidSettings(format!(
                "{len} bytes do not form a {width}x{height} {channels} frame"
            ))
        })
    }

    /// Wraps a decoded image, converting anything that is not 8-bit gray or
    /// 8-bit RGB to 8-bit RGB.
    pub fn from_image(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Self { image },
            other => Self {
                image: DynamicImage::ImageRgb8(other.to_rgb8()),
            },
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn channels(&self) -> Channels {
        match self.image {
            DynamicImage::ImageLuma8(_) => Channels::Gray,
            _ => Channels::Rgb,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_bytes()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Three-channel copy in R, G, B order. Gray samples are replicated into
    /// every channel, so no red/blue swap can occur.
    pub fn to_rgb(&self) -> NormalizedFrame {
        match &self.image {
            DynamicImage::ImageRgb8(_) => self.clone(),
            other => Self {
                image: DynamicImage::ImageRgb8(other.to_rgb8()),
            },
        }
    }

    /// Stretches the frame to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resized(&self, width: u32, height: u32, filter: ResizeFilter) -> NormalizedFrame {
        if self.width() == width && self.height() == height {
            return self.clone();
        }

        let image = match &self.image {
            DynamicImage::ImageLuma8(gray) => {
                DynamicImage::ImageLuma8(imageops::resize(gray, width, height, filter.filter_type()))
            }
            other => DynamicImage::ImageRgb8(imageops::resize(
                &other.to_rgb8(),
                width,
                height,
                filter.filter_type(),
            )),
        };
        Self { image }
    }

    pub fn to_rgba(&self) -> Vec<u8> {
        self.image.to_rgba8().into_raw()
    }
}
