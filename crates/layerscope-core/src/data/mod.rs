//! Data models for interpreted toolpaths
//!
//! Provides the geometry handed to visualization collaborators:
//! - [`Position`]: absolute machine position
//! - [`Movement`]: one straight segment, optionally carrying arc metadata
//! - [`PurgePoint`]: extrusion with no net displacement
//! - [`Layer`]: movements and purges sharing a print height

use serde::{Deserialize, Serialize};

/// Absolute machine position in length units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
}

impl Position {
    /// Create a new position with X, Y, Z coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar (XY) distance to another position
    pub fn xy_distance(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// True when all three coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Arc metadata shared by every sub-segment of one arc command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcInfo {
    /// Arc center (X, Y)
    pub center: (f64, f64),
    /// Arc radius
    pub radius: f64,
    /// Direction of travel (G2 = clockwise, G3 = counter-clockwise)
    pub clockwise: bool,
}

/// A single straight movement
///
/// Arc commands are discretized into several movements that share the same
/// [`ArcInfo`] but have distinct endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub from: Position,
    pub to: Position,
    /// Material is deposited along this movement
    pub is_extruding: bool,
    /// Extrusion without net displacement
    pub is_purge: bool,
    /// Present only on arc sub-segments
    pub arc: Option<ArcInfo>,
}

impl Movement {
    /// Create a travel movement (no extrusion)
    pub fn travel(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            is_extruding: false,
            is_purge: false,
            arc: None,
        }
    }

    /// Create an extruding movement
    pub fn extrusion(from: Position, to: Position) -> Self {
        Self {
            is_extruding: true,
            ..Self::travel(from, to)
        }
    }

    /// Attach arc metadata
    pub fn with_arc(mut self, arc: ArcInfo) -> Self {
        self.arc = Some(arc);
        self
    }

    /// Planar length of the movement
    pub fn xy_length(&self) -> f64 {
        self.from.xy_distance(&self.to)
    }

    /// True for an extrusion that can fix a layer height
    pub fn deposits_material(&self) -> bool {
        self.is_extruding && !self.is_purge
    }
}

/// Position at which material was extruded in place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PurgePoint {
    pub position: Position,
}

/// A group of movements sharing one print height
///
/// `z` stays `None` until the first extrusion assigned to the layer fixes it;
/// after that it never changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layer {
    pub z: Option<f64>,
    pub movements: Vec<Movement>,
    pub purges: Vec<PurgePoint>,
}

impl Layer {
    /// Create a layer whose height is not yet known
    pub fn pending() -> Self {
        Self::default()
    }

    /// Create a layer at a fixed height
    pub fn at(z: f64) -> Self {
        Self {
            z: Some(z),
            ..Self::default()
        }
    }

    /// True once the layer height has been fixed
    pub fn is_fixed(&self) -> bool {
        self.z.is_some()
    }

    /// Number of extruding movements (purges included)
    pub fn extrusion_count(&self) -> usize {
        self.movements.iter().filter(|m| m.is_extruding).count()
    }

    /// True when the layer holds neither movements nor purges
    pub fn is_empty(&self) -> bool {
        self.movements.is_empty() && self.purges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_default_is_origin() {
        assert_eq!(Position::default(), Position::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_xy_distance_ignores_z() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 10.0);
        assert_eq!(a.xy_distance(&b), 5.0);
    }

    #[test]
    fn test_movement_builders() {
        let from = Position::default();
        let to = Position::new(1.0, 0.0, 0.0);
        let travel = Movement::travel(from, to);
        assert!(!travel.is_extruding);
        assert!(travel.arc.is_none());

        let arc = ArcInfo {
            center: (0.0, 1.0),
            radius: 1.0,
            clockwise: true,
        };
        let extrusion = Movement::extrusion(from, to).with_arc(arc);
        assert!(extrusion.deposits_material());
        assert_eq!(extrusion.arc, Some(arc));
    }

    #[test]
    fn test_layer_constructors() {
        let pending = Layer::pending();
        assert!(!pending.is_fixed());
        assert!(pending.is_empty());

        let fixed = Layer::at(0.2);
        assert_eq!(fixed.z, Some(0.2));
    }
}
