//! Machine position tracking

use layerscope_core::Position;

/// Current absolute machine position
///
/// Owned by a single interpreter for the duration of one run. Handlers read
/// it and return a target; only the interpreter moves it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionTracker {
    position: Position,
}

impl PositionTracker {
    /// Start at the origin
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Position {
        self.position
    }

    pub fn move_to(&mut self, target: Position) {
        self.position = target;
    }

    /// Return to the origin
    pub fn reset(&mut self) {
        self.position = Position::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_moves_and_resets() {
        let mut tracker = PositionTracker::new();
        assert_eq!(tracker.current(), Position::default());

        tracker.move_to(Position::new(1.0, 2.0, 0.3));
        assert_eq!(tracker.current(), Position::new(1.0, 2.0, 0.3));

        tracker.reset();
        assert_eq!(tracker.current(), Position::default());
    }
}
