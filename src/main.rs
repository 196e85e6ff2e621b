mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use eframe::egui;

use app::TextEditorApp;
use countpad::config::Config;

#[derive(Parser)]
#[command(name = "countpad", about = "Text editor with live word and character counts")]
struct Cli {
    /// File to open at startup
    file: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Editor font size in points
    #[arg(long)]
    font_size: Option<f32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref());
    if let Some(size) = cli.font_size {
        config.set_font_size(size);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Countpad")
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };

    let initial_file = cli.file;
    eframe::run_native(
        "Countpad",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(TextEditorApp::new(cc, config, initial_file)) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
