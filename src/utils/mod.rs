mod formatting;

pub use formatting::{attribute_rows, format_tag, value_to_string};
