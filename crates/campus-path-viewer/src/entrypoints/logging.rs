//! Logging initialization.
//!
//! A helpful default `RUST_LOG` is installed when none is set, then a single `fmt`
//! layer filtered by `EnvFilter` is registered. With the `profiling` feature, the
//! `profiling` crate's scopes are emitted as tracing spans through the same subscriber.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter for debug builds
pub const DEBUG_FILTER: &str =
    "debug,eframe::native=warn,hyper_util=info,walkers=info,egui::context=warn,reqwest::connect=info";

/// Default filter for release builds
pub const RELEASE_FILTER: &str = "info,eframe::native=warn,egui::context=warn";

/// The filter used when `RUST_LOG` is not set
pub fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        DEBUG_FILTER
    } else {
        RELEASE_FILTER
    }
}

/// Initialize the global tracing subscriber. Must run before anything logs.
pub fn setup_logging() {
    let defaulted = std::env::var("RUST_LOG").is_err();
    if defaulted {
        // Safety: single-threaded at startup
        unsafe {
            std::env::set_var("RUST_LOG", default_filter());
        }
    }

    let fmt_layer = fmt::layer().with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(fmt_layer).init();

    if defaulted {
        tracing::info!("RUST_LOG set to default: {}", default_filter());
    }
}
