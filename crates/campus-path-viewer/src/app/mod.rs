//! Application module
//!
//! This module provides the main application structure:
//! - Full-screen map view centred on campus
//! - Toggleable sidebar with the query form and status banners
//! - Click-to-select on the map, snapped to the nearest known location
//! - Responsive layout (sidebar from bottom on portrait displays)

mod plugin;
pub mod settings;
mod state;
mod style;
mod ui_panels;

use crate::app::plugin::{ClickSlot, PathPlugin};
use crate::app::settings::Settings;
use crate::app::state::AppState;
use campus_path_lib::{HttpPathService, Notifier};
use eframe::egui;
use std::sync::{Arc, Mutex};
use walkers::{
    HttpTiles, Map, MapMemory,
    sources::{OpenStreetMap, TileSource},
};

/// Southern and northern campus edges
pub const CAMPUS_LAT: (f64, f64) = (43.4573326, 43.4968755);
/// Western and eastern campus edges
pub const CAMPUS_LON: (f64, f64) = (-80.5661712, -80.5243333);
/// Zoom level of the initial campus view
pub const CAMPUS_ZOOM: f64 = 14.0;

fn campus_center() -> walkers::Position {
    walkers::lat_lon(
        (CAMPUS_LAT.0 + CAMPUS_LAT.1) / 2.0,
        (CAMPUS_LON.0 + CAMPUS_LON.1) / 2.0,
    )
}

/// Zoom level that fits a span of `max_span` degrees on screen
pub fn zoom_for_span(max_span: f64) -> f64 {
    if max_span > 0.0 {
        let zoom_estimate = (4.0 * 360.0 / max_span).log2();
        (zoom_estimate - 0.5).clamp(1.0, 18.0)
    } else {
        CAMPUS_ZOOM
    }
}

/// Main application structure
pub struct CampusPathApp {
    /// Application state (locations, selection, queries, form)
    state: AppState<HttpPathService>,

    /// Map tiles provider (OpenStreetMap)
    tiles: HttpTiles,

    /// Map state (camera position, zoom, etc.)
    map_memory: MapMemory,

    /// Clicks captured by the map plugin during the last frame
    clicks: ClickSlot,
}

impl CampusPathApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: &Settings,
        service: Arc<HttpPathService>,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let repaint: Notifier = Arc::new(move || ctx.request_repaint());

        let mut state = AppState::new(settings, service, Arc::clone(&repaint));
        state.start_location_load(repaint);

        let tiles = HttpTiles::new(OpenStreetMap, cc.egui_ctx.clone());

        let mut map_memory = MapMemory::default();
        map_memory.center_at(campus_center());
        let _ = map_memory.set_zoom(CAMPUS_ZOOM);

        Self {
            state,
            tiles,
            map_memory,
            clicks: Arc::new(Mutex::new(None)),
        }
    }

    /// Fit the map view to the bounding box of all loaded locations
    fn fit_to_bounds(&mut self) {
        let Some(bounds) = self.state.locations.bounding_box() else {
            return;
        };

        let center = bounds.center();
        let max_span = bounds.width().max(bounds.height());
        let zoom = zoom_for_span(max_span);

        self.map_memory.center_at(walkers::lat_lon(center.y, center.x));
        let _ = self.map_memory.set_zoom(zoom);

        tracing::trace!(
            "Fitted to locations: ({:.4}, {:.4}) - ({:.4}, {:.4}), zoom: {:.1}",
            bounds.min().y,
            bounds.min().x,
            bounds.max().y,
            bounds.max().x,
            zoom
        );
    }

    fn take_click(&self) -> Option<campus_path_lib::LatLon> {
        match self.clicks.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

#[profiling::all_functions]
impl eframe::App for CampusPathApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.process_location_load() {
            tracing::debug!("Location index ready with {} entries", self.state.locations.len());
        }
        self.state.process_query_outcomes();

        if self.state.pending_fit_bounds {
            self.state.pending_fit_bounds = false;
            self.fit_to_bounds();
        }

        // Render the main sidebar (responsive: side or bottom based on orientation)
        ui_panels::render_sidebar(ctx, &mut self.state);

        let plan = self.state.render_plan();
        let clicks = Arc::clone(&self.clicks);
        let attribution_text = OpenStreetMap.attribution().text;

        // Central panel: Map view (full screen)
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                profiling::scope!("map_panel");

                let map = Map::new(Some(&mut self.tiles), &mut self.map_memory, campus_center())
                    .with_plugin(PathPlugin::new(plan, clicks));

                ui.add(map);

                ui_panels::sidebar_toggle_button(ui, &mut self.state);

                let painter = ui.painter();
                let screen_rect = ui.max_rect();
                painter.text(
                    screen_rect.center_bottom() + egui::vec2(0.0, -5.0),
                    egui::Align2::CENTER_BOTTOM,
                    attribution_text,
                    egui::FontId::proportional(10.0),
                    egui::Color32::from_black_alpha(180),
                );
            });

        if let Some(click) = self.take_click() {
            self.state.handle_click(click.lat, click.lon);
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_for_span() {
        assert_eq!(zoom_for_span(0.0), CAMPUS_ZOOM);
        assert_eq!(zoom_for_span(1e-9), 18.0);
        assert_eq!(zoom_for_span(360.0 * 4.0), 1.0);

        // The campus itself fits at roughly the initial zoom
        let campus = zoom_for_span(CAMPUS_LON.1 - CAMPUS_LON.0);
        assert!((13.0..=16.0).contains(&campus), "{campus}");
    }

    #[test]
    fn test_campus_center() {
        let center = campus_center();
        assert!(center.y() > CAMPUS_LAT.0 && center.y() < CAMPUS_LAT.1);
        assert!(center.x() > CAMPUS_LON.0 && center.x() < CAMPUS_LON.1);
    }
}
