//! Native application runner
//!
//! Builds the tokio runtime the path queries run on, installs logging, then hands the
//! main thread to eframe.

use crate::app::CampusPathApp;
use crate::app::settings::Settings;
use crate::entrypoints::{log_version_info, logging};
use campus_path_lib::{HttpPathService, RequestError};
use std::sync::Arc;

pub const APP_NAME: &str = "Campus Path Finder";

/// Reasons the application can fail to start or exit abnormally
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("failed to create HTTP client: {}", .0.detail())]
    Client(#[from] RequestError),

    #[error("UI error: {0}")]
    Ui(#[from] eframe::Error),
}

/// Parse the command line and run the viewer until its window is closed
pub fn run_native() -> Result<(), StartupError> {
    let settings = Settings::from_cli();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        logging::setup_logging();
        log_version_info();

        let config = settings.client_config();
        tracing::info!("Using path service at {}", config.base_url);
        let service = Arc::new(HttpPathService::new(config)?);

        let native_options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1280.0, 720.0])
                .with_title(APP_NAME),
            ..Default::default()
        };

        eframe::run_native(
            APP_NAME,
            native_options,
            Box::new(move |cc| Ok(Box::new(CampusPathApp::new(cc, &settings, service)))),
        )?;

        Ok(())
    })
}
