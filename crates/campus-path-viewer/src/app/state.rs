//! Application state management
//!
//! This module wires the core components together: the location index (loaded in the
//! background), the selection state machine, the query coordinator and the manual entry
//! form. The UI only talks to `AppState`.

use crate::app::settings::Settings;
use campus_path_lib::{
    LocationIndex, Notifier, PathPresenter, PathService, QueryCoordinator, QueryState,
    RenderPlan, SelectionController, SelectionPair, runtime,
};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Main application state
pub struct AppState<S: PathService> {
    /// Client for the path service
    service: Arc<S>,

    /// Every known location (empty until the background load finishes, or if it fails)
    pub locations: Arc<LocationIndex>,

    /// Pending background load of the location index
    location_load: Option<oneshot::Receiver<LocationIndex>>,

    /// Two-slot selection driven by map clicks
    pub selection: SelectionController,

    /// Path query lifecycle
    pub queries: QueryCoordinator<S>,

    /// Manual source/target entry
    pub form: ManualEntry,

    /// Current UI settings
    pub ui_settings: UiSettings,

    /// Recenter the map on the loaded locations on the next frame
    pub pending_fit_bounds: bool,
}

/// Editable source/target id fields.
///
/// These are what path queries are built from. Map clicks write into them and the
/// user may edit them freely; every change is fed to the query coordinator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManualEntry {
    pub source: String,
    pub target: String,
}

impl ManualEntry {
    pub fn pair(&self) -> SelectionPair {
        SelectionPair::new(self.source.clone(), self.target.clone())
    }
}

/// UI-specific settings that can be adjusted at runtime
#[derive(Clone)]
pub struct UiSettings {
    /// Draw a marker for every known location
    pub show_candidates: bool,

    /// Whether sidebar is open
    pub sidebar_open: bool,
}

impl<S: PathService> AppState<S> {
    /// Create new application state from CLI settings
    pub fn new(settings: &Settings, service: Arc<S>, notifier: Notifier) -> Self {
        let queries =
            QueryCoordinator::new(Arc::clone(&service), settings.client_config().stale_policy)
                .with_notifier(notifier);

        Self {
            service,
            locations: Arc::new(LocationIndex::default()),
            location_load: None,
            selection: SelectionController::new(),
            queries,
            form: ManualEntry::default(),
            ui_settings: UiSettings {
                show_candidates: !settings.hide_nodes,
                sidebar_open: true,
            },
            pending_fit_bounds: false,
        }
    }

    /// Start loading the location index in the background
    pub fn start_location_load(&mut self, notifier: Notifier) {
        let service = Arc::clone(&self.service);
        let (tx, rx) = oneshot::channel();
        self.location_load = Some(rx);

        runtime::spawn(async move {
            let index = LocationIndex::load(service.as_ref()).await;
            if tx.send(index).is_ok() {
                notifier();
            }
        });
    }

    /// Whether the location index is still being fetched
    pub fn is_loading_locations(&self) -> bool {
        self.location_load.is_some()
    }

    /// Pick up the location index once the background load has finished.
    ///
    /// Returns `true` on the frame the index arrives.
    pub fn process_location_load(&mut self) -> bool {
        let Some(rx) = self.location_load.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok(index) => {
                self.locations = Arc::new(index);
                self.location_load = None;
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                tracing::error!("Location load task ended without a result");
                self.location_load = None;
                false
            }
        }
    }

    /// Handle a raw map click: snap to the nearest location and advance the selection.
    ///
    /// A click that completes the selection only fills the target field, so a source
    /// typed in by hand survives. Any other click restarts the form from the new source.
    /// Clicks resolve to nothing while the index is empty.
    pub fn handle_click(&mut self, lat: f64, lon: f64) {
        let Some(location) = self.locations.nearest(lat, lon).cloned() else {
            tracing::debug!("Click at ({lat:.6}, {lon:.6}) matched no location");
            return;
        };

        let change = self.selection.pick(location);
        match change.completed_pair() {
            Some(pair) => self.form.target = pair.target.clone(),
            None => {
                self.form = ManualEntry {
                    source: change.current.source.clone(),
                    target: String::new(),
                }
            }
        }
        self.form_changed();
    }

    /// Auto-fire on the form pair; call after every edit of either field
    pub fn form_changed(&mut self) {
        self.queries.observe(&self.form.pair());
    }

    /// Explicit "Find Path" with whatever is in the form
    pub fn submit_form(&mut self) {
        self.queries.submit(&self.form.pair());
    }

    /// Apply settled path queries; returns `true` if anything changed
    pub fn process_query_outcomes(&mut self) -> bool {
        self.queries.poll() > 0
    }

    pub fn query_state(&self) -> &QueryState {
        self.queries.state()
    }

    /// What to draw on the map this frame
    pub fn render_plan(&self) -> RenderPlan {
        profiling::scope!("render_plan");
        PathPresenter::present(
            self.queries.state().result().map(|r| r.as_ref()),
            self.selection.state(),
            &self.locations,
            self.ui_settings.show_candidates,
        )
    }
}
