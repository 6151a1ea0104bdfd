//! Two-slot selection state machine
//!
//! Successive picks fill the source slot, then the target slot. A third pick is a hard
//! reset: the previous pair is dropped and the picked location becomes the new source.

use crate::location::Location;

/// Which slots are currently filled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPhase {
    Empty,
    OneSelected,
    TwoSelected,
}

/// The (source, target) identifiers driving a path query; empty strings mean unset
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectionPair {
    pub source: String,
    pub target: String,
}

impl SelectionPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Both identifiers are non-empty
    pub fn is_complete(&self) -> bool {
        !self.source.is_empty() && !self.target.is_empty()
    }

    /// Copy with surrounding whitespace removed from both identifiers
    pub fn trimmed(&self) -> Self {
        Self::new(self.source.trim(), self.target.trim())
    }
}

/// Current selection: up to two locations and the identifiers derived from them
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    selected: Vec<Location>,
    pair: SelectionPair,
}

impl SelectionState {
    /// Selected locations in pick order (source first)
    pub fn selected(&self) -> &[Location] {
        &self.selected
    }

    pub fn source_id(&self) -> &str {
        &self.pair.source
    }

    pub fn target_id(&self) -> &str {
        &self.pair.target
    }

    pub fn pair(&self) -> &SelectionPair {
        &self.pair
    }

    pub fn phase(&self) -> SelectionPhase {
        match self.selected.len() {
            0 => SelectionPhase::Empty,
            1 => SelectionPhase::OneSelected,
            _ => SelectionPhase::TwoSelected,
        }
    }
}

/// Message emitted by every transition
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionChange {
    pub phase: SelectionPhase,
    pub previous: SelectionPair,
    pub current: SelectionPair,
}

impl SelectionChange {
    /// The pair, if this transition filled both slots
    pub fn completed_pair(&self) -> Option<&SelectionPair> {
        (self.phase == SelectionPhase::TwoSelected).then_some(&self.current)
    }
}

/// Owner of the `SelectionState`; the only way to mutate it is [`SelectionController::pick`]
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn phase(&self) -> SelectionPhase {
        self.state.phase()
    }

    /// Feed a nearest-match result into the state machine.
    ///
    /// Picking the same location twice is allowed and yields a pair whose source and
    /// target are equal.
    pub fn pick(&mut self, location: Location) -> SelectionChange {
        let previous = self.state.pair.clone();

        match self.state.phase() {
            SelectionPhase::Empty => {
                self.state.pair = SelectionPair::new(location.id.clone(), "");
                self.state.selected = vec![location];
            }
            SelectionPhase::OneSelected => {
                self.state.pair.target = location.id.clone();
                self.state.selected.push(location);
            }
            SelectionPhase::TwoSelected => {
                self.state.pair = SelectionPair::new(location.id.clone(), "");
                self.state.selected = vec![location];
            }
        }

        tracing::debug!(
            "Selection {:?}: source={:?} target={:?}",
            self.state.phase(),
            self.state.pair.source,
            self.state.pair.target
        );

        SelectionChange {
            phase: self.state.phase(),
            previous,
            current: self.state.pair.clone(),
        }
    }
}
