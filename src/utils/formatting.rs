use dicom::core::dictionary::DataDictionary;
use dicom::core::header::Header;
use dicom::core::value::{PrimitiveValue, Value};
use dicom::core::{Tag, VR};
use dicom::dictionary_std::StandardDataDictionary;
use dicom::object::DefaultDicomObject;

use crate::model::AttributeRow;

const MAX_VALUE_LEN: usize = 96;

/// Lists every top-level element of the object for the attribute table.
pub fn attribute_rows(object: &DefaultDicomObject) -> Vec<AttributeRow> {
    object
        .iter()
        .map(|element| {
            let tag = element.tag();
            let vr = element.vr();
            AttributeRow {
                tag: format_tag(tag),
                vr: vr.to_string().to_owned(),
                alias: StandardDataDictionary
                    .by_tag(tag)
                    .map(|entry| entry.alias)
                    .unwrap_or("Unknown")
                    .to_string(),
                value: value_to_string(element.value(), vr),
            }
        })
        .collect()
}

pub fn value_to_string<I, P>(value: &Value<I, P>, vr: VR) -> String {
    let rendered = match value {
        Value::Primitive(primitive) => format_primitive_value(primitive, vr),
        Value::Sequence(sequence) => plural(sequence.multiplicity() as usize, "item", "Sequence"),
        Value::PixelSequence(sequence) => {
            plural(sequence.fragments().len(), "fragment", "Encapsulated pixel data")
        }
    };
    truncate(rendered)
}

pub fn format_tag(tag: Tag) -> String {
    format!("{:04X},{:04X}", tag.group(), tag.element())
}

fn plural(count: usize, noun: &str, label: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{label} ({count} {noun}{suffix})")
}

fn truncate(rendered: String) -> String {
    if rendered.chars().count() > MAX_VALUE_LEN {
        let mut truncated = rendered.chars().take(MAX_VALUE_LEN).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        rendered
    }
}

fn format_primitive_value(value: &PrimitiveValue, vr: VR) -> String {
    match value {
        PrimitiveValue::Empty => String::from("(empty)"),
        PrimitiveValue::Tags(values) => values
            .iter()
            .map(|tag| format_tag(*tag))
            .collect::<Vec<_>>()
            .join("\\"),
        PrimitiveValue::U8(_) | PrimitiveValue::U16(_) | PrimitiveValue::F32(_)
            if is_binary_vr(vr) =>
        {
            format!("Binary data ({} bytes)", value.calculate_byte_len())
        }
        _ => value.to_str().trim().to_string(),
    }
}

fn is_binary_vr(vr: VR) -> bool {
    matches!(
        vr,
        VR::OB | VR::OD | VR::OF | VR::OL | VR::OV | VR::OW | VR::UN
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_group_comma_element() {
        assert_eq!(format_tag(Tag(0x0010, 0x0010)), "0010,0010");
        assert_eq!(format_tag(Tag(0x7FE0, 0x0010)), "7FE0,0010");
    }

    #[test]
    fn binary_values_are_summarised() {
        let value = PrimitiveValue::U16([1_u16, 2, 3, 4].into_iter().collect());
        assert_eq!(format_primitive_value(&value, VR::OW), "Binary data (8 bytes)");
        assert_eq!(format_primitive_value(&value, VR::US), "1\\2\\3\\4");
    }

    #[test]
    fn long_values_are_truncated() {
        let long = "x".repeat(MAX_VALUE_LEN + 10);
        let truncated = truncate(long);
        assert_eq!(truncated.chars().count(), MAX_VALUE_LEN + 1);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn empty_values_are_marked() {
        assert_eq!(format_primitive_value(&PrimitiveValue::Empty, VR::PN), "(empty)");
    }
}
