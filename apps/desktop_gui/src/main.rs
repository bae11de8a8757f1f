use std::path::PathBuf;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod backend_bridge;
mod config;
mod controller;
mod map;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::CoralWatchApp;

#[derive(Parser, Debug)]
#[command(about = "CoralWatch desktop app")]
struct Args {
    /// Settings file (defaults to ./coralwatch.toml when present).
    #[arg(long)]
    settings_file: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let settings = config::load_settings(args.settings_file.as_deref());
    tracing::info!(?settings, "loaded settings");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CoralWatch")
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "CoralWatch",
        options,
        Box::new(|_cc| Ok(Box::new(CoralWatchApp::new(cmd_tx, ui_rx)))),
    )
}
