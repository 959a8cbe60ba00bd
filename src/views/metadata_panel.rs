use crate::message::Message;
use crate::model::SourceFile;
use iced::widget::text::Wrapping;
use iced::widget::{column, row, scrollable, text};
use iced::{Element, Length};

pub fn metadata_panel<'a>(file: Option<&'a SourceFile>, files_empty: bool) -> Element<'a, Message> {
    let Some(file) = file else {
        return if files_empty {
            text("No DICOM file uploaded.").into()
        } else {
            text("Select a file to inspect its metadata").into()
        };
    };

    let summary = file.metadata.entries().into_iter().fold(
        column![text("Patient Information").size(20)].spacing(6),
        |column, (key, value)| {
            column.push(row![
                text(key).width(Length::FillPortion(1)),
                text(value).width(Length::FillPortion(2)),
            ])
        },
    );

    let mut table = column![row![
        text("Tag").width(Length::FillPortion(2)),
        text("VR").width(Length::FillPortion(1)),
        text("Alias").width(Length::FillPortion(3)),
        text("Value").width(Length::FillPortion(4)),
    ]
    .spacing(12)];

    for attribute in &file.attributes {
        table = table.push(
            row![
                text(&attribute.tag).width(Length::FillPortion(2)),
                text(&attribute.vr).width(Length::FillPortion(1)),
                text(&attribute.alias).width(Length::FillPortion(3)),
                text(&attribute.value)
                    .width(Length::FillPortion(4))
                    .wrapping(Wrapping::Word),
            ]
            .spacing(12),
        );
    }

    column![
        text(format!("File: {}", file.name)).size(16),
        summary,
        text("All Attributes").size(16),
        scrollable(table.spacing(8)).height(Length::Fill),
    ]
    .spacing(12)
    .into()
}
