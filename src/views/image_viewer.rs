use crate::message::Message;
use iced::widget::image::Handle;
use iced::widget::{column, slider, text, Image};
use iced::{Element, Length};

pub fn image_panel(
    preview: Option<&Result<Handle, String>>,
    window_min: u8,
    window_max: u8,
) -> Element<'static, Message> {
    let Some(preview) = preview else {
        return text("Upload DICOM files to preview them").into();
    };

    let image: Element<'static, Message> = match preview {
        Ok(handle) => Image::new(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        Err(err) => text(err.clone()).into(),
    };

    column![
        text("Selected Image").size(20),
        image,
        text(format!("Min Pixel Value: {window_min}")),
        slider(0..=255, window_min, Message::WindowMinChanged),
        text(format!("Max Pixel Value: {window_max}")),
        slider(0..=255, window_max, Message::WindowMaxChanged),
    ]
    .spacing(8)
    .into()
}
