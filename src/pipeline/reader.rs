use std::fs::File;
use std::io::Read;
use std::path::Path;

use dicom::object::{open_file, DefaultDicomObject};

use crate::error::{Result, ViewerError};
use crate::image_pipeline::RawSampleExtractor;
use crate::model::{AttributeRow, Metadata, RawSample};
use crate::utils::attribute_rows;

const DICOM_EXTENSION: &str = "dcm";
const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

pub fn has_dicom_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DICOM_EXTENSION))
}

/// Reads the first frame's stored samples and the four display attributes.
pub fn read(path: &Path) -> Result<(RawSample, Metadata)> {
    let object = open_checked(path)?;
    let raw = extract_samples(path, &object)?;
    Ok((raw, metadata_of(&object)))
}

/// Like [`read`], additionally listing every top-level attribute.
pub fn read_with_attributes(path: &Path) -> Result<(RawSample, Metadata, Vec<AttributeRow>)> {
    let object = open_checked(path)?;
    let raw = extract_samples(path, &object)?;
    Ok((raw, metadata_of(&object), attribute_rows(&object)))
}

fn open_checked(path: &Path) -> Result<DefaultDicomObject> {
    log::info!("Loading DICOM file: {}", path.display());

    if !has_dicom_extension(path) {
        return Err(format_error(path, "expected a .dcm extension"));
    }
    check_signature(path)?;

    open_file(path).map_err(|err| {
        let error = format_error(path, err.to_string());
        log::error!("{error}");
        error
    })
}

fn check_signature(path: &Path) -> Result<()> {
    let mut header = [0u8; PREAMBLE_LEN + 4];
    let mut file =
        File::open(path).map_err(|err| ViewerError::io(format!("opening {}", path.display()), err))?;

    match file.read_exact(&mut header) {
        Ok(()) if &header[PREAMBLE_LEN..] == MAGIC => Ok(()),
        Ok(()) => Err(format_error(path, "missing DICM signature after the preamble")),
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(format_error(path, "file is shorter than the DICOM preamble"))
        }
        Err(err) => Err(ViewerError::io(format!("reading {}", path.display()), err)),
    }
}

fn extract_samples(path: &Path, object: &DefaultDicomObject) -> Result<RawSample> {
    RawSampleExtractor::first_frame(object).map_err(|reason| {
        log::error!("{}: {reason}", path.display());
        ViewerError::Decode {
            path: path.to_path_buf(),
            reason,
        }
    })
}

fn metadata_of(object: &DefaultDicomObject) -> Metadata {
    Metadata::from_lookup(|keyword| attribute_text(object, keyword))
}

fn attribute_text(object: &DefaultDicomObject, name: &str) -> Option<String> {
    object
        .element_by_name(name)
        .ok()
        .and_then(|element| element.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn format_error(path: &Path, reason: impl Into<String>) -> ViewerError {
    ViewerError::Format {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Channels, FALLBACK_VALUE};
    use crate::test_support::{
        write_gray_dicom, write_planar_rgb_dicom, write_rgb_dicom, FixtureAttributes,
    };
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_dicom_extension(Path::new("scan/IMG01.DCM")));
        assert!(has_dicom_extension(Path::new("a.dcm")));
        assert!(!has_dicom_extension(Path::new("a.dcm.png")));
        assert!(!has_dicom_extension(Path::new("dcm")));
    }

    #[test]
    fn wrong_extension_is_a_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image.png");
        std::fs::write(&path, b"not dicom").unwrap();

        assert!(matches!(read(&path), Err(ViewerError::Format { .. })));
    }

    #[test]
    fn missing_signature_is_a_format_error() {
        let dir = TempDir::new().unwrap();
        let short = dir.path().join("short.dcm");
        std::fs::write(&short, b"DICM").unwrap();
        let unsigned = dir.path().join("unsigned.dcm");
        std::fs::write(&unsigned, vec![0u8; 256]).unwrap();

        assert!(matches!(read(&short), Err(ViewerError::Format { .. })));
        assert!(matches!(read(&unsigned), Err(ViewerError::Format { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = PathBuf::from("/nonexistent/dir/missing.dcm");
        assert!(matches!(read(&path), Err(ViewerError::Io { .. })));
    }

    #[test]
    fn reads_stored_samples_and_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.dcm");
        let samples: Vec<u16> = (0..12).map(|v| v * 100).collect();
        write_gray_dicom(
            &path,
            4,
            3,
            &samples,
            &FixtureAttributes {
                patient_name: Some("Doe^Jane"),
                patient_id: Some("PID-7"),
                modality: Some("CT"),
                study_date: None,
            },
        );

        let (raw, metadata) = read(&path).unwrap();
        assert_eq!((raw.width(), raw.height()), (4, 3));
        assert_eq!(raw.channels(), Channels::Gray);
        assert_eq!(raw.samples()[11], 1100.0);
        assert_eq!(raw.extrema(), (0.0, 1100.0));

        assert_eq!(metadata.patient_name, "Doe^Jane");
        assert_eq!(metadata.patient_id, "PID-7");
        assert_eq!(metadata.modality, "CT");
        assert_eq!(metadata.study_date, FALLBACK_VALUE);
    }

    #[test]
    fn reads_interleaved_rgb() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("colour.dcm");
        write_rgb_dicom(&path, 2, 1, &[255, 0, 0, 0, 0, 255]);

        let (raw, _) = read(&path).unwrap();
        assert_eq!(raw.channels(), Channels::Rgb);
        assert_eq!(raw.samples(), &[255.0, 0.0, 0.0, 0.0, 0.0, 255.0]);
    }

    #[test]
    fn reads_planar_rgb_as_interleaved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("planar.dcm");
        write_planar_rgb_dicom(&path, 2, 1, &[1, 2, 10, 20, 100, 200]);

        let (raw, _) = read(&path).unwrap();
        assert_eq!(raw.channels(), Channels::Rgb);
        assert_eq!(raw.samples(), &[1.0, 10.0, 100.0, 2.0, 20.0, 200.0]);
    }

    #[test]
    fn lists_attributes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.dcm");
        write_gray_dicom(&path, 2, 2, &[0, 1, 2, 3], &FixtureAttributes::default());

        let (_, metadata, attributes) = read_with_attributes(&path).unwrap();
        assert_eq!(metadata, Metadata::default());
        let rows = attributes.iter().find(|row| row.alias == "Rows").unwrap();
        assert_eq!(rows.tag, "0028,0010");
        assert_eq!(rows.value, "2");
    }
}
