//! # sheetsql entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Initialise logging (stderr + daily log file)
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   │
//!   ├─> If command provided:
//!   │   └─> Execute CLI command and exit
//!   │
//!   └─> Otherwise:
//!       └─> Open the desktop form (eframe)
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout, clippy::print_stderr)] // CLI output and failures go to the terminal
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod cli;
mod gui;
mod theme;

use clap::Parser as _;
use sheetsql::error::{SheetSqlError, user_facing_error};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = sheetsql::logging::init() {
        match sheetsql::logging::init_stderr_only() {
            Ok(()) => tracing::warn!("File logging unavailable: {e:#}"),
            Err(_) => eprintln!("Failed to initialise logging: {e:#}"),
        }
    }

    let cli = cli::Cli::parse();

    if let Some(command) = cli.command {
        let settings = sheetsql::config::load_app_config();
        return match cli::run_command(command, settings) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("Command failed: {e:#}");
                eprintln!("{}", describe(&e));
                ExitCode::FAILURE
            }
        };
    }

    match run_gui() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("GUI failed: {e:#}");
            eprintln!("Failed to open the window: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SheetSqlError>() {
        Some(e) => user_facing_error(e),
        None => format!("Error processing the file: {err:#}"),
    }
}

fn run_gui() -> anyhow::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("SQL Script Generator")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([640.0, 420.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "sheetsql",
        native_options,
        Box::new(|cc| Ok(Box::new(gui::SqlScriptApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
