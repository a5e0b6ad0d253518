//! Keyboard move commands
//!
//! Arrow keys nudge every selected layer by a small step, Shift+arrow by a
//! leap, and Delete recenters. Coordinates are screen coordinates, so "up"
//! decreases `y`.

use serde::{Deserialize, Serialize};

use crate::offset::Offset;
use crate::selection::Selection;
use crate::store::Store;

/// Keys that drive move commands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Delete,
}

/// Distances used by the move commands
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveSteps {
    pub step: f32,
    pub leap: f32,
}

impl Default for MoveSteps {
    fn default() -> Self {
        Self {
            step: 1.0,
            leap: 10.0,
        }
    }
}

/// A command that edits the offset of every selected layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveCommand {
    Up,
    LeapUp,
    Down,
    LeapDown,
    Left,
    LeapLeft,
    Right,
    LeapRight,
    Recenter,
}

impl MoveCommand {
    pub const ALL: [MoveCommand; 9] = [
        MoveCommand::Up,
        MoveCommand::LeapUp,
        MoveCommand::Down,
        MoveCommand::LeapDown,
        MoveCommand::Left,
        MoveCommand::LeapLeft,
        MoveCommand::Right,
        MoveCommand::LeapRight,
        MoveCommand::Recenter,
    ];

    /// Map a key press to a command
    ///
    /// Shift turns a move into a leap. Shift+Delete is not bound.
    pub fn from_key(key: Key, shift: bool) -> Option<Self> {
        let command = match (key, shift) {
            (Key::Up, false) => Self::Up,
            (Key::Up, true) => Self::LeapUp,
            (Key::Down, false) => Self::Down,
            (Key::Down, true) => Self::LeapDown,
            (Key::Left, false) => Self::Left,
            (Key::Left, true) => Self::LeapLeft,
            (Key::Right, false) => Self::Right,
            (Key::Right, true) => Self::LeapRight,
            (Key::Delete, false) => Self::Recenter,
            (Key::Delete, true) => return None,
        };
        Some(command)
    }

    /// Parse a command name such as `leap-up` or `recenter`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::LeapUp => "leap-up",
            Self::Down => "down",
            Self::LeapDown => "leap-down",
            Self::Left => "left",
            Self::LeapLeft => "leap-left",
            Self::Right => "right",
            Self::LeapRight => "leap-right",
            Self::Recenter => "recenter",
        }
    }

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "Upwards",
            Self::LeapUp => "Leap Upwards",
            Self::Down => "Downwards",
            Self::LeapDown => "Leap Downwards",
            Self::Left => "Leftwards",
            Self::LeapLeft => "Leap Leftwards",
            Self::Right => "Rightwards",
            Self::LeapRight => "Leap Rightwards",
            Self::Recenter => "Recenter",
        }
    }

    /// Commands only make sense with something selected
    pub fn is_enabled(self, selection: &Selection) -> bool {
        !selection.is_empty()
    }

    /// The offset a layer ends up with after this command
    pub fn apply(self, offset: Offset, steps: MoveSteps) -> Offset {
        let MoveSteps { step, leap } = steps;
        match self {
            Self::Up => offset - (0.0, step),
            Self::LeapUp => offset - (0.0, leap),
            Self::Down => offset + (0.0, step),
            Self::LeapDown => offset + (0.0, leap),
            Self::Left => offset - (step, 0.0),
            Self::LeapLeft => offset - (leap, 0.0),
            Self::Right => offset + (step, 0.0),
            Self::LeapRight => offset + (leap, 0.0),
            Self::Recenter => Offset::ZERO,
        }
    }
}

/// Apply a move command to every selected layer
///
/// Each layer is updated independently and in no particular order. Ids that
/// no longer resolve are skipped. Returns how many layers moved.
pub fn move_selection<S: Store + ?Sized>(
    store: &mut S,
    selection: &Selection,
    command: MoveCommand,
    steps: MoveSteps,
) -> usize {
    let mut moved = 0;
    for id in selection.iter() {
        match store.find_layer_mut(id) {
            Some(layer) => {
                layer.offset = command.apply(layer.offset, steps);
                moved += 1;
            }
            None => tracing::debug!(%id, "skipping stale selection entry"),
        }
    }
    tracing::debug!(command = command.name(), moved, "applied move command");
    moved
}
