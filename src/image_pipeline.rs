use dicom::object::DefaultDicomObject;
use dicom::pixeldata::{
    ConvertOptions, DecodedPixelData, ModalityLutOption, PhotometricInterpretation, PixelDecoder,
    PixelRepresentation, PlanarConfiguration,
};

use crate::model::{Channels, RawSample};

/// Pulls stored sample values out of a DICOM object without applying any
/// modality or VOI transform.
pub struct RawSampleExtractor;

impl RawSampleExtractor {
    pub fn first_frame(object: &DefaultDicomObject) -> Result<RawSample, String> {
        let decoded = object
            .decode_pixel_data()
            .map_err(|err| format!("Failed to decode pixel data: {err}"))?;

        if decoded.number_of_frames() == 0 {
            return Err(String::from("Pixel data contains no frames"));
        }
        if decoded.number_of_frames() > 1 {
            log::debug!(
                "Using the first of {} frames",
                decoded.number_of_frames()
            );
        }

        Self::frame_samples(&decoded, 0)
    }

    pub fn frame_samples(decoded: &DecodedPixelData<'_>, frame_idx: u32) -> Result<RawSample, String> {
        if frame_idx >= decoded.number_of_frames() {
            return Err(format!(
                "Requested frame {frame_idx}, but only {} frame(s) are available",
                decoded.number_of_frames()
            ));
        }

        match decoded.photometric_interpretation() {
            photometric if photometric.is_monochrome() => Self::monochrome_samples(decoded, frame_idx),
            PhotometricInterpretation::Rgb => Self::rgb_samples(decoded, frame_idx),
            other => Self::fallback_to_dynamic(decoded, frame_idx, other.as_str()),
        }
    }

    fn monochrome_samples(decoded: &DecodedPixelData<'_>, frame_idx: u32) -> Result<RawSample, String> {
        let samples = Self::stored_values(decoded, frame_idx)?;
        RawSample::new(decoded.columns(), decoded.rows(), Channels::Gray, samples)
            .map_err(|err| err.to_string())
    }

    fn rgb_samples(decoded: &DecodedPixelData<'_>, frame_idx: u32) -> Result<RawSample, String> {
        let width = decoded.columns();
        let height = decoded.rows();
        let pixel_count = (width * height) as usize;

        // The converter only accepts interleaved samples, so planes are read raw.
        let samples = match decoded.planar_configuration() {
            PlanarConfiguration::Standard => Self::stored_values(decoded, frame_idx)?,
            PlanarConfiguration::PixelFirst => {
                interleave_planes(&Self::raw_values(decoded, frame_idx)?, pixel_count)?
            }
        };

        RawSample::new(width, height, Channels::Rgb, samples).map_err(|err| err.to_string())
    }

    fn fallback_to_dynamic(
        decoded: &DecodedPixelData<'_>,
        frame_idx: u32,
        interpretation: &str,
    ) -> Result<RawSample, String> {
        let image = decoded.to_dynamic_image(frame_idx).map_err(|err| {
            format!("Unsupported photometric interpretation `{interpretation}`: {err}")
        })?;
        log::debug!("Converted `{interpretation}` frame to RGB through the decoder");

        let rgb = image.into_rgb8();
        let (width, height) = rgb.dimensions();
        let samples = rgb.into_raw().into_iter().map(f32::from).collect();
        RawSample::new(width, height, Channels::Rgb, samples).map_err(|err| err.to_string())
    }

    fn stored_values(decoded: &DecodedPixelData<'_>, frame_idx: u32) -> Result<Vec<f32>, String> {
        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        decoded
            .to_vec_frame_with_options::<f32>(frame_idx, &options)
            .map_err(|err| format!("Failed to materialize frame data: {err}"))
    }

    /// Widens the frame's raw little-endian samples without any transform.
    fn raw_values(decoded: &DecodedPixelData<'_>, frame_idx: u32) -> Result<Vec<f32>, String> {
        let bytes = decoded
            .frame_data(frame_idx)
            .map_err(|err| format!("Failed to read frame data: {err}"))?;
        let signed = decoded.pixel_representation() == PixelRepresentation::Signed;

        match decoded.bits_allocated() {
            8 if signed => Ok(bytes.iter().map(|&b| f32::from(b as i8)).collect()),
            8 => Ok(bytes.iter().map(|&b| f32::from(b)).collect()),
            16 => Ok(bytes
                .chunks_exact(2)
                .map(|pair| {
                    let raw = [pair[0], pair[1]];
                    if signed {
                        f32::from(i16::from_le_bytes(raw))
                    } else {
                        f32::from(u16::from_le_bytes(raw))
                    }
                })
                .collect()),
            bits => Err(format!("Unsupported planar sample size of {bits} bits")),
        }
    }
}

fn interleave_planes(samples: &[f32], pixel_count: usize) -> Result<Vec<f32>, String> {
    if samples.len() < pixel_count * 3 {
        return Err(format!(
            "RGB buffer length {} is too small for {pixel_count} pixels",
            samples.len()
        ));
    }

    let (r_plane, rest) = samples.split_at(pixel_count);
    let (g_plane, b_plane) = rest.split_at(pixel_count);

    let mut interleaved = Vec::with_capacity(pixel_count * 3);
    for idx in 0..pixel_count {
        interleaved.extend_from_slice(&[r_plane[idx], g_plane[idx], b_plane[idx]]);
    }
    Ok(interleaved)
}
