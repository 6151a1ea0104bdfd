//! Campus Path Finder - Application Library
//!
//! Integrates the path-finding client core with an egui/walkers map view.

mod app;
mod entrypoints;

pub use app::CampusPathApp;
pub use app::settings::Settings;
pub use entrypoints::run::{APP_NAME, StartupError, run_native};
