pub mod export_panel;
pub mod file_browser;
pub mod image_viewer;
pub mod metadata_panel;

pub use export_panel::export_panel;
pub use file_browser::file_panel;
pub use image_viewer::image_panel;
pub use metadata_panel::metadata_panel;
