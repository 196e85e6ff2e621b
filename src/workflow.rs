//! File commands and the unsaved-changes confirmation flow.
//!
//! Everything here runs synchronously on the UI thread. User interaction
//! goes through the [`Dialogs`] trait so the flow can be driven by native
//! message boxes in the app and by scripted answers in tests.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::command::Command;
use crate::document::Document;
use crate::segment::{SegmenterProvider, UnicodeSegmenters};
use crate::stats::TextStatistics;

/// Answer to "save before continuing?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

/// Blocking user interaction needed by the file commands.
pub trait Dialogs {
    fn confirm_unsaved(&mut self, prompt: &str) -> UnsavedChoice;
    fn pick_open_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf>;
    fn pick_save_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf>;
    fn warn(&mut self, title: &str, message: &str);
}

/// What the shell should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The document plus everything derived from it that the window shows.
pub struct EditorState {
    document: Document,
    stats: TextStatistics,
    status: String,
    segmenters: Box<dyn SegmenterProvider>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::with_segmenters(Box::new(UnicodeSegmenters))
    }

    pub fn with_segmenters(segmenters: Box<dyn SegmenterProvider>) -> Self {
        let mut state = Self {
            document: Document::new(),
            stats: TextStatistics::default(),
            status: "Ready".to_owned(),
            segmenters,
        };
        state.refresh_stats();
        state
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn stats(&self) -> TextStatistics {
        self.stats
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Directory of the bound file, used as the starting point for pickers.
    pub fn working_dir(&self) -> Option<&Path> {
        self.document.path().and_then(Path::parent)
    }

    /// Editing widget reported new content.
    pub fn text_changed(&mut self, text: String) {
        self.document.set_text(text);
        self.refresh_stats();
    }

    pub fn dispatch(&mut self, command: Command, dialogs: &mut dyn Dialogs) -> Flow {
        match command {
            Command::New => self.new_file(dialogs),
            Command::Open => self.open_file(dialogs),
            Command::Save => {
                self.save_file(dialogs);
            }
            Command::SaveAs => {
                self.save_file_as(dialogs);
            }
            Command::Exit => return Flow::Exit,
        }
        Flow::Continue
    }

    pub fn new_file(&mut self, dialogs: &mut dyn Dialogs) {
        if !self.settle_unsaved(
            dialogs,
            "The document has unsaved changes. Save before creating a new file?",
        ) {
            return;
        }

        self.document = Document::new();
        self.refresh_stats();
        self.status = "New file".to_owned();
        info!("new document");
    }

    pub fn open_file(&mut self, dialogs: &mut dyn Dialogs) {
        if !self.settle_unsaved(
            dialogs,
            "The document has unsaved changes. Save before opening another file?",
        ) {
            return;
        }

        let Some(path) = dialogs.pick_open_path(self.working_dir()) else {
            return;
        };
        self.open_path(&path, dialogs);
    }

    /// Loads `path` without asking about unsaved changes. Returns whether the
    /// document was replaced.
    pub fn open_path(&mut self, path: &Path, dialogs: &mut dyn Dialogs) -> bool {
        match Document::open(path) {
            Ok(document) => {
                self.document = document;
                self.refresh_stats();
                self.status = format!("Opened: {}", path.display());
                true
            }
            Err(err) => {
                warn!("open {} failed: {err}", path.display());
                dialogs.warn("Open Failed", &format!("Cannot open file: {err}"));
                false
            }
        }
    }

    /// Saves to the bound file, or asks for one when the document is untitled.
    pub fn save_file(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        let Some(path) = self.document.path().map(Path::to_path_buf) else {
            return self.save_file_as(dialogs);
        };
        self.save_to(path, dialogs)
    }

    pub fn save_file_as(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        let Some(path) = dialogs.pick_save_path(self.working_dir()) else {
            return false;
        };
        self.save_to(path, dialogs)
    }

    fn save_to(&mut self, path: PathBuf, dialogs: &mut dyn Dialogs) -> bool {
        match self.document.save_to(&path) {
            Ok(()) => {
                self.status = format!("Saved: {}", path.display());
                true
            }
            Err(err) => {
                warn!("save {} failed: {err}", path.display());
                dialogs.warn("Save Failed", &format!("Cannot save file: {err}"));
                false
            }
        }
    }

    /// Runs the confirmation flow. Returns `false` when the pending action
    /// must be abandoned.
    fn settle_unsaved(&mut self, dialogs: &mut dyn Dialogs, prompt: &str) -> bool {
        if !self.document.is_modified() {
            return true;
        }
        match dialogs.confirm_unsaved(prompt) {
            UnsavedChoice::Cancel => false,
            UnsavedChoice::Discard => true,
            UnsavedChoice::Save => self.save_file(dialogs),
        }
    }

    fn refresh_stats(&mut self) {
        self.stats = TextStatistics::compute_with(self.segmenters.as_ref(), self.document.text());
        self.status = self.stats.to_string();
    }
}
