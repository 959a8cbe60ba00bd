use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

use crate::model::{Channels, NormalizedFrame, RawSample};

/// Rescales raw samples linearly into 0-255.
///
/// Bounds that are not supplied are taken from the samples themselves.
/// Samples outside the bounds saturate at 0 or 255, and the scaled value is
/// truncated rather than rounded. When the bounds are degenerate
/// (`max <= min`) there is no range to stretch, so every sample keeps its
/// own value saturated to 0-255: a flat frame of 128 stays 128.
pub fn normalize(raw: &RawSample, min: Option<f32>, max: Option<f32>) -> NormalizedFrame {
    let (data_min, data_max) = raw.extrema();
    let min = f64::from(min.unwrap_or(data_min));
    let max = f64::from(max.unwrap_or(data_max));
    let range = max - min;

    let scale: Box<dyn Fn(f32) -> u8> = if range > 0.0 {
        Box::new(move |value| to_u8((f64::from(value) - min) * 255.0 / range))
    } else {
        log::warn!("Degenerate intensity range [{min}, {max}], keeping samples as-is");
        Box::new(|value| to_u8(f64::from(value)))
    };

    let width = raw.width();
    let samples = raw.samples();
    let channels = raw.channels().count();
    let index = |x: u32, y: u32| (y as usize * width as usize + x as usize) * channels;

    let image = match raw.channels() {
        Channels::Gray => DynamicImage::ImageLuma8(GrayImage::from_fn(width, raw.height(), |x, y| {
            Luma([scale(samples[index(x, y)])])
        })),
        Channels::Rgb => DynamicImage::ImageRgb8(RgbImage::from_fn(width, raw.height(), |x, y| {
            let i = index(x, y);
            Rgb([
                scale(samples[i]),
                scale(samples[i + 1]),
                scale(samples[i + 2]),
            ])
        })),
    };

    NormalizedFrame::from_image(image)
}

fn to_u8(value: f64) -> u8 {
    // `as` truncates toward zero and maps NaN to 0.
    value.clamp(0.0, 255.0) as u8
}
