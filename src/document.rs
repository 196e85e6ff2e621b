use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("{source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document has no file yet")]
    Untitled,
}

/// The one open document: its text, the file it is bound to, and whether it
/// has changed since it was last loaded or saved.
#[derive(Debug, Default)]
pub struct Document {
    text: String,
    path: Option<PathBuf>,
    modified: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `path` as UTF-8. Invalid byte sequences are replaced with
    /// U+FFFD rather than rejected.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        let path = path.into();
        let bytes = fs::read(&path).map_err(|source| DocumentError::Open {
            path: path.clone(),
            source,
        })?;

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!("{} is not valid UTF-8, replacing invalid sequences", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        info!("opened {} ({} bytes)", path.display(), text.len());
        Ok(Self {
            text,
            path: Some(path),
            modified: false,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// File name of the bound path, or `Untitled`.
    pub fn title(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_owned())
    }

    /// Replaces the text. Only a real change marks the document modified.
    pub fn set_text(&mut self, new_text: String) {
        if new_text != self.text {
            self.text = new_text;
            self.modified = true;
        }
    }

    /// Writes to the bound path.
    pub fn save(&mut self) -> Result<(), DocumentError> {
        let path = self.path.clone().ok_or(DocumentError::Untitled)?;
        self.write(&path)?;
        self.modified = false;
        Ok(())
    }

    /// Writes to `path` and binds the document to it. A failed write leaves
    /// the previous binding in place.
    pub fn save_to(&mut self, path: impl Into<PathBuf>) -> Result<(), DocumentError> {
        let path = path.into();
        self.write(&path)?;
        self.path = Some(path);
        self.modified = false;
        Ok(())
    }

    fn write(&self, path: &Path) -> Result<(), DocumentError> {
        fs::write(path, self.text.as_bytes()).map_err(|source| DocumentError::Save {
            path: path.to_owned(),
            source,
        })?;
        info!("saved {} ({} bytes)", path.display(), self.text.len());
        Ok(())
    }
}
