use crate::message::Message;
use crate::pipeline::StillFormat;
use iced::widget::text::Wrapping;
use iced::widget::{button, container, text, Container, Row};
use iced::{Alignment, Background, Color, Length, Shadow, Theme};

/// Pill-shaped selector for the still image format.
pub fn format_toggle(current: StillFormat) -> Container<'static, Message> {
    let last = StillFormat::ALL.len() - 1;
    let toggle_row = StillFormat::ALL
        .into_iter()
        .enumerate()
        .fold(Row::new().spacing(0), |row, (index, format)| {
            let position = match index {
                0 => SegmentPosition::Left,
                i if i == last => SegmentPosition::Right,
                _ => SegmentPosition::Middle,
            };
            row.push(segmented_toggle_option(format, current, position).width(Length::FillPortion(1)))
        });

    container(toggle_row)
        .padding(3)
        .width(Length::Fill)
        .style(segmented_container_style)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentPosition {
    Left,
    Middle,
    Right,
}

fn segmented_toggle_option(
    format: StillFormat,
    current: StillFormat,
    position: SegmentPosition,
) -> iced::widget::Button<'static, Message> {
    let is_active = format == current;
    let content = container(text(format.to_string()).size(14).wrapping(Wrapping::None))
        .width(Length::Fill)
        .height(Length::Fixed(32.0))
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .padding([6, 12]);

    button(content)
        .padding(0)
        .on_press(Message::SetStillFormat(format))
        .style(move |theme, status| segmented_button_style(theme, status, is_active, position))
}

fn segmented_container_style(theme: &Theme) -> iced::widget::container::Style {
    let palette = theme.extended_palette();

    iced::widget::container::Style {
        background: Some(Background::Color(palette.background.strong.color)),
        border: iced::border::Border {
            color: palette.background.strong.color.scale_alpha(0.6),
            width: 1.0,
            radius: iced::border::Radius::new(999.0),
        },
        ..Default::default()
    }
}

fn segmented_button_style(
    theme: &Theme,
    status: iced::widget::button::Status,
    is_active: bool,
    position: SegmentPosition,
) -> iced::widget::button::Style {
    use iced::widget::button::Status;

    let palette = theme.extended_palette();
    let (idle, hovered) = if is_active {
        (palette.primary.strong.color, palette.primary.base.color)
    } else {
        (
            palette.background.strong.color.scale_alpha(0.4),
            palette.background.base.color.scale_alpha(0.8),
        )
    };

    let background_color = match status {
        Status::Active => idle,
        Status::Hovered => hovered,
        Status::Pressed => hovered.scale_alpha(0.9),
        Status::Disabled => idle.scale_alpha(0.5),
    };

    let text_color = if is_active {
        palette.primary.strong.text
    } else {
        palette.background.base.text
    };

    let (outer, inner) = (999.0, 6.0);
    let radius = match position {
        SegmentPosition::Left => iced::border::Radius {
            top_left: outer,
            top_right: inner,
            bottom_right: inner,
            bottom_left: outer,
        },
        SegmentPosition::Middle => iced::border::Radius::new(inner),
        SegmentPosition::Right => iced::border::Radius {
            top_left: inner,
            top_right: outer,
            bottom_right: outer,
            bottom_left: inner,
        },
    };

    iced::widget::button::Style {
        background: Some(Background::Color(background_color)),
        text_color,
        border: iced::border::Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius,
        },
        shadow: Shadow::default(),
    }
}
