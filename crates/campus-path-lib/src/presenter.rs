//! Marker decimation and render plans
//!
//! A returned path can contain hundreds of points. The line is always drawn through
//! all of them, but only the endpoints and every `WAYPOINT_STRIDE`-th interior point
//! get a marker.

use crate::location::{LatLon, LocationIndex};
use crate::query::PathResult;
use crate::selection::SelectionState;

/// Interior path points whose index is a multiple of this get a waypoint marker
pub const WAYPOINT_STRIDE: usize = 5;

/// What a marker stands for; the renderer derives its style from this
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    Start,
    End,
    Waypoint,
    Candidate,
    Selected,
}

/// A marker to draw, computed fresh for every frame
#[derive(Clone, Debug, PartialEq)]
pub struct RenderMarker {
    pub position: LatLon,
    pub role: MarkerRole,
    /// Popup text shown on hover
    pub label: String,
}

impl RenderMarker {
    fn new(position: LatLon, role: MarkerRole, label: impl Into<String>) -> Self {
        Self {
            position,
            role,
            label: label.into(),
        }
    }
}

/// Everything the map renderer needs for one frame, in draw order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderPlan {
    /// Candidate markers, drawn below the path
    pub candidates: Vec<RenderMarker>,
    /// Full, undecimated path geometry
    pub line: Vec<LatLon>,
    /// Start, end and waypoint markers
    pub path_markers: Vec<RenderMarker>,
    /// Selected locations, drawn on top
    pub selected: Vec<RenderMarker>,
}

impl RenderPlan {
    /// All markers in draw order
    pub fn markers(&self) -> impl Iterator<Item = &RenderMarker> {
        self.candidates
            .iter()
            .chain(&self.path_markers)
            .chain(&self.selected)
    }
}

/// Stateless translation of query results and selection into render instructions
pub struct PathPresenter;

impl PathPresenter {
    /// Role of the point at `index` in a path of `len` points, `None` if it gets no marker.
    ///
    /// A single-point path only gets a start marker.
    pub fn role_at(index: usize, len: usize) -> Option<MarkerRole> {
        if index >= len {
            None
        } else if index == 0 {
            Some(MarkerRole::Start)
        } else if index == len - 1 {
            Some(MarkerRole::End)
        } else if index % WAYPOINT_STRIDE == 0 {
            Some(MarkerRole::Waypoint)
        } else {
            None
        }
    }

    /// Start, end and decimated waypoint markers for a coordinate sequence
    pub fn path_markers(coords: &[LatLon]) -> Vec<RenderMarker> {
        profiling::scope!("PathPresenter::path_markers");

        coords
            .iter()
            .enumerate()
            .filter_map(|(index, &position)| {
                Self::role_at(index, coords.len()).map(|role| {
                    let label = match role {
                        MarkerRole::Start => "Start Point".to_string(),
                        MarkerRole::End => "End Point".to_string(),
                        _ => format!("Node {}", index + 1),
                    };
                    RenderMarker::new(position, role, label)
                })
            })
            .collect()
    }

    /// One small marker per known location
    pub fn candidate_markers(index: &LocationIndex) -> Vec<RenderMarker> {
        index
            .iter()
            .map(|location| {
                RenderMarker::new(
                    location.position(),
                    MarkerRole::Candidate,
                    format!("Node {}", location.id),
                )
            })
            .collect()
    }

    /// Markers for the currently selected locations (source first)
    pub fn selection_markers(selection: &SelectionState) -> Vec<RenderMarker> {
        selection
            .selected()
            .iter()
            .enumerate()
            .map(|(slot, location)| {
                let label = if slot == 0 {
                    "Selected Start"
                } else {
                    "Selected End"
                };
                RenderMarker::new(location.position(), MarkerRole::Selected, label)
            })
            .collect()
    }

    /// Build the complete plan for one frame
    pub fn present(
        result: Option<&PathResult>,
        selection: &SelectionState,
        locations: &LocationIndex,
        show_candidates: bool,
    ) -> RenderPlan {
        let coords = result.map(|r| r.coords.as_slice()).unwrap_or_default();

        RenderPlan {
            candidates: if show_candidates {
                Self::candidate_markers(locations)
            } else {
                Vec::new()
            },
            line: coords.to_vec(),
            path_markers: Self::path_markers(coords),
            selected: Self::selection_markers(selection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use crate::selection::SelectionController;

    fn coords(len: usize) -> Vec<LatLon> {
        (0..len)
            .map(|i| LatLon::new(43.46 + i as f64 * 1e-4, -80.54))
            .collect()
    }

    fn count(markers: &[RenderMarker], role: MarkerRole) -> usize {
        markers.iter().filter(|m| m.role == role).count()
    }

    #[test]
    fn test_empty_path_has_no_markers() {
        assert!(PathPresenter::path_markers(&[]).is_empty());
        let plan = PathPresenter::present(
            None,
            SelectionController::new().state(),
            &LocationIndex::default(),
            true,
        );
        assert_eq!(plan, RenderPlan::default());
    }

    #[test]
    fn test_single_point_is_start_only() {
        let markers = PathPresenter::path_markers(&coords(1));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].role, MarkerRole::Start);
        assert_eq!(markers[0].label, "Start Point");
    }

    #[test]
    fn test_two_points_start_and_end() {
        let markers = PathPresenter::path_markers(&coords(2));
        assert_eq!(
            markers.iter().map(|m| m.role).collect::<Vec<_>>(),
            vec![MarkerRole::Start, MarkerRole::End]
        );
        assert_eq!(markers[1].label, "End Point");
    }

    #[test]
    fn test_decimation_law() {
        for len in 0..60 {
            let markers = PathPresenter::path_markers(&coords(len));
            let expected_waypoints = if len < 3 {
                0
            } else {
                (1..=len - 2).filter(|i| i % WAYPOINT_STRIDE == 0).count()
            };
            assert_eq!(count(&markers, MarkerRole::Waypoint), expected_waypoints, "len {len}");
            assert_eq!(count(&markers, MarkerRole::Start), usize::from(len >= 1));
            assert_eq!(count(&markers, MarkerRole::End), usize::from(len >= 2));
        }
    }

    #[test]
    fn test_waypoint_indices_and_labels() {
        let markers = PathPresenter::path_markers(&coords(12));
        let waypoints: Vec<&str> = markers
            .iter()
            .filter(|m| m.role == MarkerRole::Waypoint)
            .map(|m| m.label.as_str())
            .collect();
        assert_eq!(waypoints, vec!["Node 6", "Node 11"]);
    }

    #[test]
    fn test_last_index_multiple_of_stride_is_end() {
        // Index 10 is both a multiple of 5 and the last point
        let markers = PathPresenter::path_markers(&coords(11));
        assert_eq!(markers.last().unwrap().role, MarkerRole::End);
        assert_eq!(count(&markers, MarkerRole::Waypoint), 1);
    }

    #[test]
    fn test_line_is_never_decimated() {
        let result = PathResult {
            distance_meters: 812.0,
            coords: coords(37),
        };
        let plan = PathPresenter::present(
            Some(&result),
            SelectionController::new().state(),
            &LocationIndex::default(),
            false,
        );
        assert_eq!(plan.line, result.coords);
        assert_eq!(plan.path_markers.len(), 2 + 7);
    }

    #[test]
    fn test_present_candidates_and_selection() {
        let index = LocationIndex::new(vec![
            Location::new("1", 0.0, 0.0),
            Location::new("2", 1.0, 1.0),
        ]);
        let mut selection = SelectionController::new();
        selection.pick(Location::new("1", 0.0, 0.0));
        selection.pick(Location::new("2", 1.0, 1.0));

        let plan = PathPresenter::present(None, selection.state(), &index, true);
        assert_eq!(plan.candidates.len(), 2);
        assert_eq!(plan.candidates[1].label, "Node 2");
        assert_eq!(
            plan.selected
                .iter()
                .map(|m| m.label.as_str())
                .collect::<Vec<_>>(),
            vec!["Selected Start", "Selected End"]
        );
        assert_eq!(plan.markers().count(), 4);

        let hidden = PathPresenter::present(None, selection.state(), &index, false);
        assert!(hidden.candidates.is_empty());
    }
}
