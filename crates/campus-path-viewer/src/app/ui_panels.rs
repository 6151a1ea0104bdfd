//! UI panels for the application
//!
//! The sidebar holds the manual entry form, the status banners and a few map
//! controls; the toggle button is overlaid on the map.

use crate::app::state::AppState;
use crate::app::style::{GOLD, PURPLE};
use campus_path_lib::{PathResult, PathService, SelectionPhase, SelectionState};
use egui::{Color32, RichText, Ui};

pub const TITLE: &str = "Campus Path Finder";
pub const INSTRUCTIONS: &str =
    "Click on the map to select start and end points, or enter node IDs manually.";
pub const SOURCE_HINT: &str = "Source Node ID (10 digits)";
pub const TARGET_HINT: &str = "Target Node ID (10 digits)";

/// Text of the banner shown after a successful query
pub fn success_banner(result: &PathResult) -> String {
    format!("Path found! {}", result.distance_label())
}

/// One-line summary of the current selection
pub fn selection_summary(selection: &SelectionState) -> String {
    match selection.phase() {
        SelectionPhase::Empty => "No points selected".to_string(),
        SelectionPhase::OneSelected => format!(
            "Start: {}. Click another point to select the end.",
            selection.source_id()
        ),
        SelectionPhase::TwoSelected => format!(
            "Start: {} → End: {}",
            selection.source_id(),
            selection.target_id()
        ),
    }
}

/// Render the sidebar toggle button (overlaid on top-right of map)
pub fn sidebar_toggle_button<S: PathService>(ui: &mut Ui, state: &mut AppState<S>) {
    let button_size = egui::vec2(40.0, 40.0);
    let margin = 10.0;

    // Position button in top-right corner
    let rect = ui.max_rect();
    let button_pos = rect.right_top() + egui::vec2(-button_size.x - margin, margin);
    let button_rect = egui::Rect::from_min_size(button_pos, button_size);

    let response = ui.allocate_rect(button_rect, egui::Sense::click());

    if response.clicked() {
        state.ui_settings.sidebar_open = !state.ui_settings.sidebar_open;
    }

    let bg_color = if response.hovered() {
        ui.visuals().widgets.hovered.bg_fill
    } else {
        ui.visuals().widgets.inactive.bg_fill
    };

    ui.painter().rect_filled(button_rect, 5.0, bg_color);

    let icon = if state.ui_settings.sidebar_open {
        "✕"
    } else {
        "☰"
    };

    ui.painter().text(
        button_rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(20.0),
        ui.visuals().text_color(),
    );
}

/// Render the main sidebar (responsive: side on landscape, bottom on portrait)
pub fn render_sidebar<S: PathService>(ctx: &egui::Context, state: &mut AppState<S>) {
    if !state.ui_settings.sidebar_open {
        return;
    }

    let screen_size = ctx.viewport_rect().size();
    let is_portrait = screen_size.y > screen_size.x;

    if is_portrait {
        egui::TopBottomPanel::bottom("main_sidebar")
            .default_height(280.0)
            .min_height(180.0)
            .max_height(ctx.viewport_rect().height() * 0.6)
            .resizable(true)
            .show(ctx, |ui| render_sidebar_content(ui, state));
    } else {
        egui::SidePanel::right("main_sidebar")
            .default_width(320.0)
            .min_width(260.0)
            .max_width(450.0)
            .resizable(true)
            .show(ctx, |ui| render_sidebar_content(ui, state));
    }
}

fn render_sidebar_content<S: PathService>(ui: &mut Ui, state: &mut AppState<S>) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.heading(RichText::new(TITLE).strong().color(PURPLE));
            ui.add_space(4.0);
            ui.label(RichText::new(INSTRUCTIONS).small());

            ui.add_space(8.0);
            ui.separator();

            render_query_form(ui, state);

            ui.add_space(8.0);
            render_banners(ui, state);

            ui.add_space(8.0);
            ui.separator();

            render_map_section(ui, state);
        });
}

/// Source/target fields and the "Find Path" button
fn render_query_form<S: PathService>(ui: &mut Ui, state: &mut AppState<S>) {
    egui::Grid::new("query_form")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Start Node ID:");
            let source = ui.add(
                egui::TextEdit::singleline(&mut state.form.source).hint_text(SOURCE_HINT),
            );
            ui.end_row();

            ui.label("End Node ID:");
            let target = ui.add(
                egui::TextEdit::singleline(&mut state.form.target).hint_text(TARGET_HINT),
            );
            ui.end_row();

            if source.changed() || target.changed() {
                state.form_changed();
            }
        });

    ui.add_space(6.0);

    let loading = state.query_state().loading();
    ui.horizontal(|ui| {
        let button = egui::Button::new(RichText::new("Find Path").strong().color(PURPLE))
            .fill(GOLD);
        if ui.add_enabled(!loading, button).clicked() {
            state.submit_form();
        }
        if loading {
            ui.add(egui::Spinner::new());
            ui.label("Finding...");
        }
    });
}

/// Error and success banners; both can be visible at once
fn render_banners<S: PathService>(ui: &mut Ui, state: &AppState<S>) {
    let query = state.query_state();

    if let Some(error) = query.error() {
        ui.label(RichText::new(error).strong().color(Color32::RED));
        ui.add_space(4.0);
    }

    if let Some(result) = query.result() {
        ui.label(
            RichText::new(success_banner(result))
                .strong()
                .color(Color32::from_rgb(0x2E, 0x7D, 0x32)),
        );
    }
}

/// Selection summary, location stats and map controls
fn render_map_section<S: PathService>(ui: &mut Ui, state: &mut AppState<S>) {
    ui.label(RichText::new(selection_summary(state.selection.state())).strong());
    ui.add_space(8.0);

    egui::Grid::new("stats_grid")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("Nodes:");
            if state.is_loading_locations() {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label(RichText::new("loading").color(ui.visuals().warn_fg_color));
                });
            } else {
                ui.label(RichText::new(format!("{}", state.locations.len())).strong());
            }
            ui.end_row();

            if let Some(result) = state.query_state().result() {
                ui.label("Path points:");
                ui.label(RichText::new(format!("{}", result.coords.len())).strong());
                ui.end_row();
            }
        });

    if !state.is_loading_locations() && state.locations.is_empty() {
        ui.label(
            RichText::new("No nodes loaded; map clicks are ignored.")
                .small()
                .color(ui.visuals().warn_fg_color),
        );
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!state.locations.is_empty(), egui::Button::new("🎯 Fit to nodes"))
            .clicked()
        {
            state.pending_fit_bounds = true;
        }
        ui.checkbox(&mut state.ui_settings.show_candidates, "Show nodes");
    });
}
