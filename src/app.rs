use std::path::PathBuf;

use eframe::egui;
use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use tracing::debug;

use countpad::command::Command;
use countpad::config::Config;
use countpad::dialogs::NativeDialogs;
use countpad::highlight::Highlighter;
use countpad::indent::{fix_up_insertion, line_number_gutter};
use countpad::workflow::{EditorState, Flow};

/// Width of the line-number margin, in digits.
const LINE_NUMBER_DIGITS: usize = 5;

const EDITOR_ID: &str = "countpad_editor";

/// What survives between runs (eframe storage).
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct PersistedState {
    last_dir: Option<PathBuf>,
}

pub struct TextEditorApp {
    state: EditorState,
    dialogs: NativeDialogs,
    highlighter: Highlighter,
    config: Config,

    // Commands from menu clicks and shortcuts, run after the UI pass
    pending: Vec<Command>,
    window_title: String,
}

impl TextEditorApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        initial_file: Option<PathBuf>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let persisted: PersistedState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let mut dialogs = NativeDialogs::new(persisted.last_dir);
        let mut state = EditorState::new();
        if let Some(path) = initial_file {
            state.open_path(&path, &mut dialogs);
        }

        Self {
            state,
            dialogs,
            highlighter: Highlighter::new(),
            config,
            pending: Vec::new(),
            window_title: String::new(),
        }
    }

    /// Menu "File"
    fn file_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("File", |ui| {
            for command in Command::ALL {
                if command.starts_group() {
                    ui.separator();
                }

                let shortcut = ui.ctx().format_shortcut(&command.shortcut());
                let button = egui::Button::new(command.label()).shortcut_text(shortcut);
                if ui.add(button).clicked() {
                    self.pending.push(command);
                    ui.close_menu(); // deprecated, but still closes the popup
                }
            }
        });
    }

    fn poll_shortcuts(&mut self, ctx: &egui::Context) {
        for command in Command::SHORTCUT_ORDER {
            if ctx.input_mut(|i| i.consume_shortcut(&command.shortcut())) {
                self.pending.push(command);
            }
        }
    }

    /// Line numbers and the highlighted text field
    fn editor_area(&mut self, ui: &mut egui::Ui) {
        let font_size = self.config.font_size;
        let font = egui::FontId::monospace(font_size);
        let indent = self.config.indent;
        let line_numbers = self.config.line_numbers;

        let editor_id = egui::Id::new(EDITOR_ID);
        let syntax = self.highlighter.syntax_for(self.state.document().path());
        // Caret from the previous frame, for brace matching.
        let caret = egui::TextEdit::load_state(ui.ctx(), editor_id)
            .and_then(|state| state.cursor.char_range())
            .map(|range| range.primary.index);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    if line_numbers {
                        let gutter = line_number_gutter(self.state.text(), LINE_NUMBER_DIGITS);
                        ui.vertical(|ui| {
                            // Matches the text field's inner top margin.
                            ui.add_space(2.0);
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(gutter)
                                        .font(font.clone())
                                        .color(Color32::GRAY),
                                )
                                .selectable(false),
                            );
                        });
                    }

                    let highlighter = &mut self.highlighter;
                    let mut layouter =
                        |ui: &egui::Ui, buffer: &dyn egui::TextBuffer, wrap_width: f32| {
                            let mut job =
                                highlighter.layout(buffer.as_str(), &syntax, caret, font_size);
                            job.wrap.max_width = wrap_width;
                            ui.painter().layout_job(job)
                        };

                    let mut text = self.state.text().to_owned();
                    let mut output = egui::TextEdit::multiline(&mut text)
                        .id(editor_id)
                        .font(font)
                        .text_color(Color32::BLACK)
                        .layouter(&mut layouter)
                        .lock_focus(true)
                        .desired_rows(30)
                        .desired_width(f32::INFINITY)
                        .show(ui);

                    if output.response.changed() {
                        let caret = output.cursor_range.map(|range| range.primary.index);
                        let fixed = caret.and_then(|caret| {
                            fix_up_insertion(self.state.text(), &text, caret, indent)
                        });
                        if let Some((fixed, caret)) = fixed {
                            text = fixed;
                            output.state.cursor.set_char_range(Some(
                                egui::text::CCursorRange::one(egui::text::CCursor::new(caret)),
                            ));
                            output.state.store(ui.ctx(), output.response.id);
                        }
                        self.state.text_changed(text);
                    }
                });
            });
    }

    fn run_pending(&mut self, ctx: &egui::Context) {
        for command in std::mem::take(&mut self.pending) {
            debug!(?command, "running command");
            if self.state.dispatch(command, &mut self.dialogs) == Flow::Exit {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                break;
            }
        }
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let document = self.state.document();
        let marker = if document.is_modified() { "*" } else { "" };
        let title = format!("Countpad - {}{marker}", document.title());

        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }
    }
}

impl eframe::App for TextEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_shortcuts(ctx);

        // Top menu
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                self.file_menu(ui);
            });
        });

        // Status line with the live counts
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(self.state.status());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.editor_area(ui);
        });

        self.run_pending(ctx);
        self.sync_title(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let persisted = PersistedState {
            last_dir: self.dialogs.last_dir().map(PathBuf::from),
        };
        eframe::set_value(storage, eframe::APP_KEY, &persisted);
    }
}
