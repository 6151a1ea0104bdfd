#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::process::ExitCode;

fn main() -> ExitCode {
    match campus_path_viewer::run_native() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{}: {e}", campus_path_viewer::APP_NAME);
            ExitCode::FAILURE
        }
    }
}
