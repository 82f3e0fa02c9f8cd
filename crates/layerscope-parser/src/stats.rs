//! Toolpath statistics derived from interpreted layers

use layerscope_core::{Layer, Position};
use serde::Serialize;

/// Bounding box accumulator over movement endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// Empty bounds; invalid until the first update
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            max_x: f64::MIN,
            min_y: f64::MAX,
            max_y: f64::MIN,
            min_z: f64::MAX,
            max_z: f64::MIN,
        }
    }

    pub fn update(&mut self, position: Position) {
        self.min_x = self.min_x.min(position.x);
        self.max_x = self.max_x.max(position.x);
        self.min_y = self.min_y.min(position.y);
        self.max_y = self.max_y.max(position.y);
        self.min_z = self.min_z.min(position.z);
        self.max_z = self.max_z.max(position.z);
    }

    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
            && self.min_z.is_finite()
            && self.max_z.is_finite()
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
            // a single plane has min_z == max_z
            && self.min_z <= self.max_z
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn height(&self) -> f64 {
        self.max_z - self.min_z
    }
}

/// Counts and lengths for one layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub index: usize,
    pub z: Option<f64>,
    pub movements: usize,
    pub extrusions: usize,
    pub travels: usize,
    pub purges: usize,
    /// Movements that are arc sub-segments
    pub arc_segments: usize,
    /// XY path length of material-depositing moves
    pub extrusion_length: f64,
    /// XY path length of non-extruding moves
    pub travel_length: f64,
}

impl LayerSummary {
    pub fn from_layer(index: usize, layer: &Layer) -> Self {
        let mut summary = Self {
            index,
            z: layer.z,
            movements: layer.movements.len(),
            extrusions: 0,
            travels: 0,
            purges: layer.purges.len(),
            arc_segments: 0,
            extrusion_length: 0.0,
            travel_length: 0.0,
        };

        for movement in &layer.movements {
            if movement.arc.is_some() {
                summary.arc_segments += 1;
            }
            if movement.deposits_material() {
                summary.extrusions += 1;
                summary.extrusion_length += movement.xy_length();
            } else if !movement.is_extruding {
                summary.travels += 1;
                summary.travel_length += movement.xy_length();
            }
        }

        summary
    }
}

/// Whole-toolpath statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolpathStats {
    pub layers: Vec<LayerSummary>,
    /// `None` when no movement was recorded
    pub bounds: Option<Bounds>,
    pub total_movements: usize,
    pub total_extrusions: usize,
    pub total_travels: usize,
    pub total_purges: usize,
    pub total_extrusion_length: f64,
    pub total_travel_length: f64,
}

impl ToolpathStats {
    pub fn from_layers(layers: &[Layer]) -> Self {
        let summaries: Vec<LayerSummary> = layers
            .iter()
            .enumerate()
            .map(|(index, layer)| LayerSummary::from_layer(index, layer))
            .collect();

        let mut bounds = Bounds::new();
        for movement in layers.iter().flat_map(|layer| &layer.movements) {
            bounds.update(movement.from);
            bounds.update(movement.to);
        }

        Self {
            total_movements: summaries.iter().map(|s| s.movements).sum(),
            total_extrusions: summaries.iter().map(|s| s.extrusions).sum(),
            total_travels: summaries.iter().map(|s| s.travels).sum(),
            total_purges: summaries.iter().map(|s| s.purges).sum(),
            total_extrusion_length: summaries.iter().map(|s| s.extrusion_length).sum(),
            total_travel_length: summaries.iter().map(|s| s.travel_length).sum(),
            bounds: bounds.is_valid().then_some(bounds),
            layers: summaries,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerscope_core::Movement;

    fn p(x: f64, y: f64, z: f64) -> Position {
        Position::new(x, y, z)
    }

    #[test]
    fn test_bounds_start_invalid() {
        assert!(!Bounds::new().is_valid());
        let mut bounds = Bounds::new();
        bounds.update(p(1.0, 2.0, 0.2));
        assert!(bounds.is_valid());
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.height(), 0.0);
    }

    #[test]
    fn test_layer_summary_counts() {
        let here = p(10.0, 0.0, 0.2);
        let mut layer = Layer::at(0.2);
        layer.movements.push(Movement::travel(p(0.0, 0.0, 0.2), p(3.0, 4.0, 0.2)));
        layer.movements.push(Movement::extrusion(p(3.0, 4.0, 0.2), here));
        layer.movements.push(Movement {
            is_purge: true,
            ..Movement::extrusion(here, here)
        });
        layer.purges.push(layerscope_core::PurgePoint { position: here });

        let summary = LayerSummary::from_layer(0, &layer);
        assert_eq!(summary.movements, 3);
        assert_eq!(summary.travels, 1);
        assert_eq!(summary.extrusions, 1);
        assert_eq!(summary.purges, 1);
        assert!((summary.travel_length - 5.0).abs() < 1e-12);
        assert!((summary.extrusion_length - 53.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_toolpath() {
        let stats = ToolpathStats::from_layers(&[]);
        assert_eq!(stats.layer_count(), 0);
        assert_eq!(stats.bounds, None);
        assert_eq!(stats.total_movements, 0);
    }

    #[test]
    fn test_totals_and_bounds() {
        let mut first = Layer::at(0.2);
        first.movements.push(Movement::extrusion(p(0.0, 0.0, 0.2), p(10.0, 0.0, 0.2)));
        let mut second = Layer::at(0.4);
        second.movements.push(Movement::travel(p(10.0, 0.0, 0.2), p(10.0, 5.0, 0.4)));

        let stats = ToolpathStats::from_layers(&[first, second]);
        assert_eq!(stats.layer_count(), 2);
        assert_eq!(stats.total_movements, 2);
        assert_eq!(stats.total_extrusions, 1);
        assert_eq!(stats.total_travels, 1);
        assert!((stats.total_extrusion_length - 10.0).abs() < 1e-12);

        let bounds = stats.bounds.unwrap();
        assert_eq!((bounds.min_x, bounds.max_x), (0.0, 10.0));
        assert_eq!((bounds.min_y, bounds.max_y), (0.0, 5.0));
        assert_eq!((bounds.min_z, bounds.max_z), (0.2, 0.4));
    }
}
