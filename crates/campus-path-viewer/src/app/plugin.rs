//! Walkers plugin for drawing the current render plan and capturing map clicks
//!
//! The plugin is rebuilt every frame from a fresh `RenderPlan`. Clicks are unprojected
//! to WGS84 and written to a shared slot that the app drains after the map is drawn.

use crate::app::style::{marker_style, path_stroke};
use campus_path_lib::{LatLon, RenderMarker, RenderPlan};
use std::sync::{Arc, Mutex};
use walkers::{Plugin, Projector};

/// Extra pointer slack around a marker when hit-testing hover
const HOVER_SLACK: f32 = 2.0;

/// Last primary click on the map, in WGS84
pub type ClickSlot = Arc<Mutex<Option<LatLon>>>;

/// Plugin for rendering the path, markers and hover labels
pub struct PathPlugin {
    plan: RenderPlan,
    clicks: ClickSlot,
}

impl PathPlugin {
    pub fn new(plan: RenderPlan, clicks: ClickSlot) -> Self {
        Self { plan, clicks }
    }
}

fn to_screen(projector: &Projector, position: LatLon) -> egui::Pos2 {
    let screen_vec = projector.project(walkers::lat_lon(position.lat, position.lon));
    egui::Pos2::new(screen_vec.x, screen_vec.y)
}

/// Index of the topmost marker under the pointer, if any.
///
/// Markers are in draw order, so later ones win.
pub fn hit_test(markers: &[(egui::Pos2, f32)], pointer: egui::Pos2) -> Option<usize> {
    markers
        .iter()
        .rposition(|&(center, radius)| center.distance(pointer) <= radius + HOVER_SLACK)
}

impl Plugin for PathPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _map_memory: &walkers::MapMemory,
    ) {
        profiling::scope!("PathPlugin::run");

        let painter = ui.painter();

        if self.plan.line.len() >= 2 {
            let screen_points: Vec<egui::Pos2> = self
                .plan
                .line
                .iter()
                .map(|&p| to_screen(projector, p))
                .collect();
            painter.add(egui::Shape::line(screen_points, path_stroke()));
        }

        let markers: Vec<&RenderMarker> = self.plan.markers().collect();
        let placed: Vec<(egui::Pos2, f32)> = markers
            .iter()
            .map(|m| {
                (
                    to_screen(projector, m.position),
                    marker_style(m.role, false).radius,
                )
            })
            .collect();

        let hovered = response.hover_pos().and_then(|p| hit_test(&placed, p));

        {
            profiling::scope!("render_markers");
            for (i, (marker, &(center, _))) in markers.iter().zip(&placed).enumerate() {
                let style = marker_style(marker.role, hovered == Some(i));
                painter.circle(center, style.radius, style.fill, style.stroke);
            }
        }

        if let Some(i) = hovered {
            let (center, radius) = placed[i];
            painter.text(
                center + egui::vec2(0.0, -(radius + 4.0)),
                egui::Align2::CENTER_BOTTOM,
                &markers[i].label,
                egui::FontId::proportional(13.0),
                ui.visuals().strong_text_color(),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let position = projector.unproject(pointer.to_vec2());
            let click = LatLon::new(position.y(), position.x());
            match self.clicks.lock() {
                Ok(mut slot) => *slot = Some(click),
                Err(poisoned) => *poisoned.into_inner() = Some(click),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_prefers_topmost() {
        let markers = [
            (egui::pos2(10.0, 10.0), 3.0),
            (egui::pos2(12.0, 10.0), 10.0),
        ];
        assert_eq!(hit_test(&markers, egui::pos2(10.0, 10.0)), Some(1));
        assert_eq!(hit_test(&markers, egui::pos2(-10.0, 10.0)), None);
    }

    #[test]
    fn test_hit_test_slack() {
        let markers = [(egui::pos2(0.0, 0.0), 3.0)];
        assert_eq!(hit_test(&markers, egui::pos2(5.0, 0.0)), Some(0));
        assert_eq!(hit_test(&markers, egui::pos2(5.5, 0.0)), None);
        assert_eq!(hit_test(&[], egui::pos2(0.0, 0.0)), None);
    }
}
