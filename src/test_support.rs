//! DICOM fixtures written with dicom-rs for the unit tests.

use std::path::Path;

use dicom::core::{DataElement, PrimitiveValue, VR};
use dicom::dictionary_std::{tags, uids};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAttributes<'a> {
    pub patient_name: Option<&'a str>,
    pub patient_id: Option<&'a str>,
    pub modality: Option<&'a str>,
    pub study_date: Option<&'a str>,
}

/// Writes a 16-bit unsigned MONOCHROME2 image.
pub fn write_gray_dicom(
    path: &Path,
    columns: u16,
    rows: u16,
    samples: &[u16],
    attributes: &FixtureAttributes<'_>,
) {
    let mut object = base_object(columns, rows, attributes);
    put(&mut object, tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16));
    put(&mut object, tags::PHOTOMETRIC_INTERPRETATION, VR::CS, PrimitiveValue::from("MONOCHROME2"));
    put(&mut object, tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16));
    put(&mut object, tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16));
    put(&mut object, tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16));
    put(&mut object, tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16));
    put(
        &mut object,
        tags::PIXEL_DATA,
        VR::OW,
        PrimitiveValue::U16(samples.iter().copied().collect()),
    );
    write(object, path);
}

/// Writes a uniform 16-bit grayscale image.
pub fn write_flat_dicom(path: &Path, columns: u16, rows: u16, value: u16) {
    let samples = vec![value; usize::from(columns) * usize::from(rows)];
    write_gray_dicom(path, columns, rows, &samples, &FixtureAttributes::default());
}

/// Writes an 8-bit interleaved RGB image.
pub fn write_rgb_dicom(path: &Path, columns: u16, rows: u16, samples: &[u8]) {
    write_rgb_with_planar_configuration(path, columns, rows, samples, 0);
}

/// Writes an 8-bit RGB image stored as three colour planes.
pub fn write_planar_rgb_dicom(path: &Path, columns: u16, rows: u16, planes: &[u8]) {
    write_rgb_with_planar_configuration(path, columns, rows, planes, 1);
}

fn write_rgb_with_planar_configuration(
    path: &Path,
    columns: u16,
    rows: u16,
    samples: &[u8],
    planar_configuration: u16,
) {
    let mut object = base_object(columns, rows, &FixtureAttributes::default());
    put(&mut object, tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(3_u16));
    put(&mut object, tags::PHOTOMETRIC_INTERPRETATION, VR::CS, PrimitiveValue::from("RGB"));
    put(
        &mut object,
        tags::PLANAR_CONFIGURATION,
        VR::US,
        PrimitiveValue::from(planar_configuration),
    );
    put(&mut object, tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(8_u16));
    put(&mut object, tags::BITS_STORED, VR::US, PrimitiveValue::from(8_u16));
    put(&mut object, tags::HIGH_BIT, VR::US, PrimitiveValue::from(7_u16));
    put(&mut object, tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16));
    put(
        &mut object,
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::U8(samples.iter().copied().collect()),
    );
    write(object, path);
}

fn base_object(columns: u16, rows: u16, attributes: &FixtureAttributes<'_>) -> InMemDicomObject {
    let mut object = InMemDicomObject::new_empty();
    put(
        &mut object,
        tags::SOP_CLASS_UID,
        VR::UI,
        PrimitiveValue::from(uids::SECONDARY_CAPTURE_IMAGE_STORAGE),
    );
    put(&mut object, tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(INSTANCE_UID));

    let optional = [
        (tags::PATIENT_NAME, VR::PN, attributes.patient_name),
        (tags::PATIENT_ID, VR::LO, attributes.patient_id),
        (tags::MODALITY, VR::CS, attributes.modality),
        (tags::STUDY_DATE, VR::DA, attributes.study_date),
    ];
    for (tag, vr, value) in optional {
        if let Some(value) = value {
            put(&mut object, tag, vr, PrimitiveValue::from(value));
        }
    }

    put(&mut object, tags::ROWS, VR::US, PrimitiveValue::from(rows));
    put(&mut object, tags::COLUMNS, VR::US, PrimitiveValue::from(columns));
    object
}

const INSTANCE_UID: &str = "1.2.826.0.1.3680043.2.1125.1";

fn put(object: &mut InMemDicomObject, tag: dicom::core::Tag, vr: VR, value: PrimitiveValue) {
    object.put(DataElement::new(tag, vr, value));
}

fn write(object: InMemDicomObject, path: &Path) {
    let file = object
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(INSTANCE_UID),
        )
        .expect("fixture file meta should be valid");
    file.write_to_file(path).expect("fixture should be written");
}
