//! Marker and line styles
//!
//! Styles are computed per draw call from the marker role and hover flag; there is
//! no shared style object that hover handlers mutate.

use campus_path_lib::MarkerRole;
use egui::{Color32, Stroke};

/// Campus purple
pub const PURPLE: Color32 = Color32::from_rgb(0x4F, 0x26, 0x83);
/// Campus gold
pub const GOLD: Color32 = Color32::from_rgb(0xFF, 0xB8, 0x1C);

const SELECTED_RED: Color32 = Color32::from_rgb(0xFF, 0x00, 0x00);
const CANDIDATE_GREY: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);

/// How a single circle marker is painted
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub fill: Color32,
    pub stroke: Stroke,
}

/// Style for a marker of the given role
pub fn marker_style(role: MarkerRole, hovered: bool) -> MarkerStyle {
    match role {
        MarkerRole::Start => MarkerStyle {
            radius: 8.0,
            fill: GOLD,
            stroke: Stroke::new(2.0, GOLD),
        },
        MarkerRole::End => MarkerStyle {
            radius: 8.0,
            fill: PURPLE,
            stroke: Stroke::new(2.0, PURPLE),
        },
        MarkerRole::Waypoint => MarkerStyle {
            radius: 4.0,
            fill: Color32::WHITE.gamma_multiply(0.8),
            stroke: Stroke::new(1.0, PURPLE),
        },
        MarkerRole::Selected => MarkerStyle {
            radius: 10.0,
            fill: SELECTED_RED,
            stroke: Stroke::new(2.0, SELECTED_RED),
        },
        MarkerRole::Candidate => MarkerStyle {
            radius: if hovered { 4.0 } else { 3.0 },
            fill: Color32::WHITE.gamma_multiply(if hovered { 0.9 } else { 0.6 }),
            stroke: Stroke::new(1.0, CANDIDATE_GREY),
        },
    }
}

/// Stroke of the path polyline
pub fn path_stroke() -> Stroke {
    Stroke::new(3.0, PURPLE.gamma_multiply(0.8))
}
