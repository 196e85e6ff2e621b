use std::path::{Path, PathBuf};

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::workflow::{Dialogs, UnsavedChoice};

/// Native message boxes and file pickers.
///
/// Remembers the directory of the last picked file so that an untitled
/// document still opens the picker somewhere sensible.
#[derive(Debug, Default)]
pub struct NativeDialogs {
    last_dir: Option<PathBuf>,
}

impl NativeDialogs {
    pub fn new(last_dir: Option<PathBuf>) -> Self {
        Self { last_dir }
    }

    pub fn last_dir(&self) -> Option<&Path> {
        self.last_dir.as_deref()
    }

    fn file_dialog(&self, title: &str, start_dir: Option<&Path>) -> FileDialog {
        let dialog = FileDialog::new().set_title(title);
        match start_dir.or(self.last_dir.as_deref()) {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn remember(&mut self, picked: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(dir) = picked.as_deref().and_then(Path::parent) {
            self.last_dir = Some(dir.to_path_buf());
        }
        picked
    }
}

impl Dialogs for NativeDialogs {
    fn confirm_unsaved(&mut self, prompt: &str) -> UnsavedChoice {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Unsaved Changes")
            .set_description(prompt)
            .set_buttons(MessageButtons::YesNoCancel)
            .show();

        match answer {
            MessageDialogResult::Yes => UnsavedChoice::Save,
            MessageDialogResult::No => UnsavedChoice::Discard,
            // Closing the box counts as cancelling.
            _ => UnsavedChoice::Cancel,
        }
    }

    fn pick_open_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf> {
        let picked = self.file_dialog("Open File", start_dir).pick_file();
        self.remember(picked)
    }

    fn pick_save_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf> {
        let picked = self.file_dialog("Save File As", start_dir).save_file();
        self.remember(picked)
    }

    fn warn(&mut self, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
