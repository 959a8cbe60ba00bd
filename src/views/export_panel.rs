use crate::components::format_toggle;
use crate::message::Message;
use crate::pipeline::StillFormat;
use iced::widget::{button, column, text};
use iced::Element;

pub fn export_panel(format: StillFormat, has_selection: bool) -> Element<'static, Message> {
    let save_still = button(text(format!("Download {format}")))
        .on_press_maybe(has_selection.then_some(Message::SaveStill));
    let save_video = button("Download MP4 Video")
        .on_press_maybe(has_selection.then_some(Message::SaveVideo));

    column![
        text("Select format to download").size(16),
        format_toggle(format),
        save_still,
        save_video,
    ]
    .spacing(10)
    .into()
}
