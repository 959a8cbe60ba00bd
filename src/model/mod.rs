pub mod frame;
pub mod metadata;
pub mod raw_sample;
pub mod source_file;

pub use frame::{Channels, NormalizedFrame, ResizeFilter};
pub use metadata::{AttributeRow, Metadata, FALLBACK_VALUE};
pub use raw_sample::RawSample;
pub use source_file::SourceFile;
