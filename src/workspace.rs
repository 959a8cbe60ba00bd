use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Result, ViewerError};

/// A file as received from the picker: its name and contents.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Final component of the upload name, the name it is staged under.
    pub fn file_name(&self) -> Option<&str> {
        Path::new(&self.name)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
    }
}

/// Uniquely named scratch directory owned by one upload batch. It is removed
/// when the workspace is dropped.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("dicomovie-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|err| ViewerError::io("creating workspace", err))?;

        log::debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes an upload into the workspace under its bare file name.
    pub fn stage(&self, upload: &Upload) -> Result<PathBuf> {
        let name = upload.file_name().ok_or_else(|| ViewerError::Format {
                path: PathBuf::from(&upload.name),
                reason: String::from("upload has no file name"),
            })?;

        let path = self.dir.path().join(name);
        std::fs::write(&path, &upload.bytes)
            .map_err(|err| ViewerError::io(format!("staging {}", upload.name), err))?;
        Ok(path)
    }

    /// A fresh, not yet existing path for an artifact with `suffix`.
    pub fn artifact_path(&self, suffix: &str) -> Result<PathBuf> {
        let file = tempfile::Builder::new()
            .prefix("artifact-")
            .suffix(suffix)
            .tempfile_in(self.dir.path())
            .map_err(|err| ViewerError::io("allocating artifact path", err))?;

        // Keep the unique name but let the encoder create the file itself.
        let path = file.path().to_path_buf();
        file.close()
            .map_err(|err| ViewerError::io("allocating artifact path", err))?;
        Ok(path)
    }
}
