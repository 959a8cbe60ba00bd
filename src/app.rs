use std::path::PathBuf;

use iced::widget::image::Handle;
use iced::widget::text::Wrapping;
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{application, Alignment, Element, Length, Task, Theme};
use rfd::AsyncFileDialog;

use crate::config::ViewerConfig;
use crate::message::Message;
use crate::pipeline::{StillFormat, Window};
use crate::session::{Request, Response, Session};
use crate::views::{export_panel, file_panel, image_panel, metadata_panel};
use crate::workspace::Upload;

const APP_TITLE: &str = "Dicomovie";

pub fn run() -> iced::Result {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .try_init();

    application(APP_TITLE, App::update, App::view)
        .theme(App::theme)
        .run()
}

pub struct App {
    session: Session,
    window_min: u8,
    window_max: u8,
    still_format: StillFormat,
    preview: Option<Result<Handle, String>>,
    status: Option<String>,
    last_error: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        let (config, last_error) = match ViewerConfig::from_env() {
            Ok(config) => (config, None),
            Err(err) => {
                log::error!("Falling back to default settings: {err}");
                (ViewerConfig::default(), Some(err.to_string()))
            }
        };

        Self {
            session: Session::new(config),
            window_min: 0,
            window_max: 255,
            still_format: StillFormat::default(),
            preview: None,
            status: None,
            last_error,
        }
    }
}

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFiles => Task::perform(pick_uploads(), Message::FilesPicked),
            Message::FilesPicked(uploads) => {
                if uploads.is_empty() {
                    return Task::none();
                }
                match self.session.handle(Request::Upload(uploads)) {
                    Ok(Response::Loaded { names, skipped }) => {
                        self.last_error = (!skipped.is_empty())
                            .then(|| format!("Skipped unreadable files: {}", skipped.join(", ")));
                        self.status = Some(format!("Loaded {} file(s)", names.len()));
                    }
                    Ok(_) => {}
                    Err(err) => self.last_error = Some(err.to_string()),
                }
                self.refresh_preview();
                Task::none()
            }
            Message::SelectFile(name) => {
                self.run(Request::Select(name));
                self.refresh_preview();
                Task::none()
            }
            Message::WindowMinChanged(value) => {
                self.window_min = value;
                self.apply_window();
                Task::none()
            }
            Message::WindowMaxChanged(value) => {
                self.window_max = value;
                self.apply_window();
                Task::none()
            }
            Message::SetStillFormat(format) => {
                self.still_format = format;
                Task::none()
            }
            Message::SaveStill => match self.session.handle(Request::ExportStill(self.still_format)) {
                Ok(Response::Still(still)) => {
                    Task::perform(save_bytes(still.file_name, still.bytes), Message::Saved)
                }
                Ok(_) => Task::none(),
                Err(err) => {
                    self.last_error = Some(err.to_string());
                    Task::none()
                }
            },
            Message::SaveVideo => match self.session.handle(Request::ExportVideo) {
                Ok(Response::Video(video)) => Task::perform(
                    save_bytes(video.file_name().to_string(), video.bytes),
                    Message::Saved,
                ),
                Ok(_) => Task::none(),
                Err(err) => {
                    self.last_error = Some(err.to_string());
                    Task::none()
                }
            },
            Message::Saved(result) => {
                match result {
                    Ok(Some(path)) => {
                        self.status = Some(format!("Saved {}", path.display()));
                        self.last_error = None;
                    }
                    Ok(None) => {}
                    Err(err) => self.last_error = Some(err),
                }
                Task::none()
            }
        }
    }

    fn run(&mut self, request: Request) {
        if let Err(err) = self.session.handle(request) {
            self.last_error = Some(err.to_string());
        }
    }

    fn apply_window(&mut self) {
        self.run(Request::SetWindow(Window {
            min: i32::from(self.window_min),
            max: i32::from(self.window_max),
        }));
        self.refresh_preview();
    }

    fn refresh_preview(&mut self) {
        self.preview = self.session.preview().map(|result| {
            result
                .map(|frame| Handle::from_rgba(frame.width(), frame.height(), frame.to_rgba()))
                .map_err(|err| err.to_string())
        });
    }

    pub fn view(&self) -> Element<'_, Message> {
        let pick_button = button("Upload DICOM Files").on_press(Message::PickFiles);

        let selected = self.session.selected_file();

        let files = container(scrollable(file_panel(
            self.session.files(),
            selected.map(|file| file.name.as_str()),
        )))
        .padding(16)
        .width(Length::FillPortion(2));

        let image = container(image_panel(
            self.preview.as_ref(),
            self.window_min,
            self.window_max,
        ))
        .padding(16)
        .width(Length::FillPortion(5))
        .height(Length::Fill)
        .align_x(Alignment::Center)
        .align_y(Alignment::Center);

        let details = container(
            column![
                metadata_panel(selected, self.session.files().is_empty()),
                export_panel(self.still_format, selected.is_some()),
            ]
            .spacing(24),
        )
        .padding(16)
        .width(Length::FillPortion(3));

        let mut content = column![row![files, image, details]
            .spacing(16)
            .width(Length::Fill)
            .height(Length::Fill)]
        .spacing(16);

        if let Some(status) = &self.status {
            content = content.push(text(status).size(14));
        }
        if let Some(error) = &self.last_error {
            content = content.push(text(error).size(16).wrapping(Wrapping::Word));
        }

        column![pick_button, content]
            .padding(20)
            .spacing(20)
            .align_x(Alignment::Start)
            .into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

async fn pick_uploads() -> Vec<Upload> {
    let Some(handles) = AsyncFileDialog::new()
        .add_filter("DICOM", &["dcm", "DCM"])
        .pick_files()
        .await
    else {
        return Vec::new();
    };

    let mut uploads = Vec::with_capacity(handles.len());
    for handle in handles {
        uploads.push(Upload::new(handle.file_name(), handle.read().await));
    }
    uploads
}

async fn save_bytes(file_name: String, bytes: Vec<u8>) -> Result<Option<PathBuf>, String> {
    let Some(handle) = AsyncFileDialog::new()
        .set_file_name(&file_name)
        .save_file()
        .await
    else {
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    std::fs::write(&path, &bytes).map_err(|err| {
        let message = format!("{}: failed to save ({err})", path.display());
        log::error!("{message}");
        message
    })?;
    log::info!("Saved {}", path.display());
    Ok(Some(path))
}
