use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{BatchPolicy, ViewerConfig};
use crate::error::{Result, ViewerError};
use crate::model::{NormalizedFrame, SourceFile};
use crate::pipeline::{
    apply_window, normalize, read_with_attributes, sequence, FfmpegEncoder, StillArtifact,
    StillExporter, StillFormat, VideoArtifact, VideoEncoder, VideoExporter, Window,
};
use crate::workspace::{Upload, Workspace};

/// One user action.
#[derive(Debug, Clone)]
pub enum Request {
    /// Replace the loaded series with a new batch of files.
    Upload(Vec<Upload>),
    /// Select a loaded file by name.
    Select(String),
    /// Set the display window. Validated when it is applied.
    SetWindow(Window),
    ExportVideo,
    ExportStill(StillFormat),
}

#[derive(Debug, Clone)]
pub enum Response {
    Loaded { names: Vec<String>, skipped: Vec<String> },
    Selected(String),
    WindowChanged(Window),
    Video(VideoArtifact),
    Still(StillArtifact),
}

/// Viewer state for one user. Each request is handled once, synchronously,
/// and only touches the state it names.
pub struct Session {
    config: ViewerConfig,
    workspace: Option<Workspace>,
    files: Vec<SourceFile>,
    selected: Option<usize>,
    window: Window,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            workspace: None,
            files: Vec::new(),
            selected: None,
            window: Window::FULL,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn handle(&mut self, request: Request) -> Result<Response> {
        match request {
            Request::Upload(uploads) => self.upload(uploads),
            Request::Select(name) => self.select(&name),
            Request::SetWindow(window) => {
                self.window = window;
                Ok(Response::WindowChanged(window))
            }
            Request::ExportVideo => self.export_video().map(Response::Video),
            Request::ExportStill(format) => self.export_still(format).map(Response::Still),
        }
    }

    /// Loaded files in name order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn selected_file(&self) -> Option<&SourceFile> {
        self.selected.and_then(|index| self.files.get(index))
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// The selected frame under the current window, if a file is selected.
    pub fn preview(&self) -> Option<Result<NormalizedFrame>> {
        self.selected_file()
            .map(|file| apply_window(&file.frame, self.window))
    }

    fn upload(&mut self, uploads: Vec<Upload>) -> Result<Response> {
        if uploads.is_empty() {
            return Err(ViewerError::EmptyInput);
        }

        let workspace = Workspace::create(self.config.workspace_root.as_deref())?;

        // Keyed by staged name: sorted byte-wise, and a repeated name keeps the last upload.
        let mut by_name = BTreeMap::new();
        for mut upload in uploads {
            if let Some(name) = upload.file_name().map(str::to_string) {
                upload.name = name;
            }
            if let Some(previous) = by_name.insert(upload.name.clone(), upload) {
                log::warn!("Upload `{}` was supplied twice, keeping the last", previous.name);
            }
        }

        let mut files = Vec::with_capacity(by_name.len());
        let mut skipped = Vec::new();
        for upload in by_name.values() {
            match Self::load(&workspace, upload) {
                Ok(file) => files.push(file),
                Err(err) if self.config.batch_policy == BatchPolicy::SkipAndWarn && err.is_per_file() => {
                    log::warn!("Skipping {}: {err}", upload.name);
                    skipped.push(upload.name.clone());
                }
                Err(err) => return Err(err),
            }
        }

        if files.is_empty() {
            return Err(ViewerError::EmptyInput);
        }

        let names = files.iter().map(|file| file.name.clone()).collect();
        log::info!("Loaded {} file(s) into {}", files.len(), workspace.path().display());

        self.workspace = Some(workspace);
        self.files = files;
        self.selected = Some(0);
        Ok(Response::Loaded { names, skipped })
    }

    fn load(workspace: &Workspace, upload: &Upload) -> Result<SourceFile> {
        let path = workspace.stage(upload)?;
        let (raw, metadata, attributes) = read_with_attributes(&path)?;

        Ok(SourceFile {
            name: upload.name.clone(),
            frame: normalize(&raw, None, None),
            path,
            metadata,
            attributes,
        })
    }

    fn select(&mut self, name: &str) -> Result<Response> {
        let index = self
            .files
            .iter()
            .position(|file| file.name == name)
            .ok_or_else(|| ViewerError::UnknownFile(name.to_string()))?;

        self.selected = Some(index);
        Ok(Response::Selected(name.to_string()))
    }

    fn export_video(&self) -> Result<VideoArtifact> {
        let workspace = self.workspace.as_ref().ok_or(ViewerError::EmptyInput)?;
        let output = workspace.artifact_path(".mp4")?;
        self.export_video_with(FfmpegEncoder::from_config(&self.config, output))
    }

    /// Sequences the loaded files and encodes them with `encoder`.
    pub fn export_video_with<E: VideoEncoder>(&self, encoder: E) -> Result<VideoArtifact> {
        let paths: Vec<PathBuf> = self.files.iter().map(|file| file.path.clone()).collect();
        let frames = sequence(&paths, &self.config)?;

        VideoExporter::new(encoder).export(
            &frames,
            self.config.frame_rate,
            (self.config.output_width, self.config.output_height),
        )
    }

    fn export_still(&self, format: StillFormat) -> Result<StillArtifact> {
        let file = self.selected_file().ok_or(ViewerError::NoSelection)?;
        StillExporter::export(
            &file.frame,
            &file.name,
            self.window.min,
            self.window.max,
            format,
        )
    }
}
