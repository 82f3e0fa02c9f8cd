//! Linear move handling (G0/G1)

use layerscope_core::{Movement, Position, PurgePoint};

use crate::gcode::ParsedLine;

/// Result of interpreting one linear move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMove {
    pub movement: Movement,
    /// Set when material is extruded without moving
    pub purge: Option<PurgePoint>,
}

impl LinearMove {
    /// Position the machine ends up at
    pub fn target(&self) -> Position {
        self.movement.to
    }
}

/// Interpret a linear move from `current`
///
/// Axes without a word keep their previous value (absolute positioning).
/// Any positive `E` marks the move as extruding; an extruding move whose
/// target equals `current` is a purge.
pub fn interpret_linear(line: &ParsedLine<'_>, current: Position) -> LinearMove {
    let mut target = current;
    for (letter, value) in &line.params {
        match letter {
            'X' => target.x = *value,
            'Y' => target.y = *value,
            'Z' => target.z = *value,
            _ => {}
        }
    }

    let is_extruding = line.is_extruding();
    let is_purge = is_extruding && target == current;

    LinearMove {
        movement: Movement {
            from: current,
            to: target,
            is_extruding,
            is_purge,
            arc: None,
        },
        purge: is_purge.then_some(PurgePoint { position: current }),
    }
}
