use crate::entrypoints::cli::parse_args;
use campus_path_lib::{BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL, StaleResponsePolicy};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Campus Path Finder - pick two points on the campus map and see the shortest path between them
pub struct Settings {
    /// Base URL of the path service
    #[clap(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Give up on a request after this many seconds (default: wait for the transport)
    #[clap(long, value_name = "SECONDS")]
    pub request_timeout_secs: Option<u64>,

    /// Drop responses that arrive after a newer path query was issued
    #[clap(long, default_value = "false")]
    pub discard_stale_responses: bool,

    /// Do not draw a marker for every known location
    #[clap(long, default_value = "false")]
    pub hide_nodes: bool,
}

impl Settings {
    /// Parse from the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match parse_args::<Settings>() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Client configuration derived from these settings
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            stale_policy: if self.discard_stale_responses {
                StaleResponsePolicy::DiscardStale
            } else {
                StaleResponsePolicy::ApplyAll
            },
        }
    }
}
