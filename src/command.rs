use egui::{Key, KeyboardShortcut, Modifiers};

/// Actions reachable from the File menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    New,
    Open,
    Save,
    SaveAs,
    Exit,
}

impl Command {
    /// Menu order.
    pub const ALL: [Command; 5] = [
        Command::New,
        Command::Open,
        Command::Save,
        Command::SaveAs,
        Command::Exit,
    ];

    /// Order in which shortcuts are polled. egui matches `Ctrl+S` against a
    /// `Ctrl+Shift+S` press, so the shifted variant has to be consumed first.
    pub const SHORTCUT_ORDER: [Command; 5] = [
        Command::SaveAs,
        Command::New,
        Command::Open,
        Command::Save,
        Command::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Command::New => "New",
            Command::Open => "Open...",
            Command::Save => "Save",
            Command::SaveAs => "Save As...",
            Command::Exit => "Exit",
        }
    }

    pub fn shortcut(self) -> KeyboardShortcut {
        match self {
            Command::New => KeyboardShortcut::new(Modifiers::COMMAND, Key::N),
            Command::Open => KeyboardShortcut::new(Modifiers::COMMAND, Key::O),
            Command::Save => KeyboardShortcut::new(Modifiers::COMMAND, Key::S),
            Command::SaveAs => {
                KeyboardShortcut::new(Modifiers::COMMAND | Modifiers::SHIFT, Key::S)
            }
            Command::Exit => KeyboardShortcut::new(Modifiers::COMMAND, Key::Q),
        }
    }

    /// Whether a separator goes above this entry in the menu.
    pub fn starts_group(self) -> bool {
        self == Command::Exit
    }
}
