//! Campus Path Library - Client-side core of the campus path finder
//!
//! This library holds the interaction logic behind the map client: resolving a raw
//! click to the closest known location, turning successive picks into a source/target
//! pair, issuing shortest-path queries against the remote path service and deciding
//! which points of a returned path become markers.
//!
//! # Architecture
//!
//! - **[`LocationIndex`]**: All known locations, loaded once, answering nearest-match queries
//! - **[`SelectionController`]**: Two-slot state machine producing a [`SelectionPair`]
//! - **[`QueryCoordinator`]**: Async lifecycle of path queries (loading, error, result)
//! - **[`PathPresenter`]**: Decimated marker set and full line geometry for rendering
//! - **[`PathService`]**: Seam to the remote service, implemented over HTTP by [`HttpPathService`]
//!
//! Rendering is left to the caller; nothing in here depends on a GUI toolkit.

mod config;
mod error;
mod location;
mod presenter;
mod query;
pub mod runtime;
mod selection;
mod service;

// Public API exports
pub use config::{BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL};
pub use error::{NO_RESPONSE_MESSAGE, RequestError, classify_failure};
pub use location::{LatLon, Location, LocationIndex};
pub use presenter::{MarkerRole, PathPresenter, RenderMarker, RenderPlan, WAYPOINT_STRIDE};
pub use query::{
    Notifier, PathResult, QueryCoordinator, QueryOutcome, QueryState, QueryTicket,
    StaleResponsePolicy,
};
pub use selection::{SelectionChange, SelectionController, SelectionPair, SelectionPhase, SelectionState};
pub use service::{HttpPathService, PathService};
