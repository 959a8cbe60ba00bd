use crate::message::Message;
use crate::model::SourceFile;
use iced::widget::text::Wrapping;
use iced::widget::{button, column, text, Column};
use iced::Length;

pub fn file_panel<'a>(files: &'a [SourceFile], selected: Option<&str>) -> Column<'a, Message> {
    let root = column![text("Uploaded Files").size(20)];

    if files.is_empty() {
        return root.push(text("No files uploaded"));
    }

    files
        .iter()
        .fold(root, |column, file| {
            let is_selected = selected == Some(file.name.as_str());
            let label = if is_selected {
                format!("▶ {}", file.name)
            } else {
                file.name.clone()
            };

            column.push(
                button(text(label).wrapping(Wrapping::Word).width(Length::Fill))
                    .width(Length::Fill)
                    .on_press(Message::SelectFile(file.name.clone())),
            )
        })
        .spacing(6)
}
