pub mod segmented_toggle;

pub use segmented_toggle::format_toggle;
