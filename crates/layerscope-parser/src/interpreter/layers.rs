//! Grouping movements into layers
//!
//! Layers are keyed by Z height. Before the first extrusion everything lands
//! in a single pending layer whose height is fixed by that extrusion. After
//! it, any movement to a different Z opens a new layer.
//!
//! Retraction Z-hops would otherwise show up as spurious layers. A
//! retraction remembers the Z it happened at, and the wipe that follows it
//! routes the current layer back to the layer at that height. Travel moves
//! that stay at the hop height after the wipe remain on that layer.

use layerscope_core::{Layer, Movement, Position, PurgePoint};
use tracing::debug;

/// Retraction bookkeeping around a retraction and its wipe
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RetractionState {
    /// No retraction awaiting a wipe
    #[default]
    Idle,
    /// A retraction happened at height `z`
    Pending { z: f64 },
    /// A wipe resolved a retraction while the nozzle was at `hop_z`
    Wiping { hop_z: f64 },
}

impl RetractionState {
    /// Transition on a retraction; a newer retraction replaces an older one
    pub fn retract(self, z: f64) -> Self {
        Self::Pending { z }
    }

    /// Transition on a wipe at height `at_z`, yielding the height to return to if any
    pub fn wipe(self, at_z: f64) -> (Self, Option<f64>) {
        match self {
            Self::Pending { z } => (Self::Wiping { hop_z: at_z }, Some(z)),
            other => (other, None),
        }
    }

    /// True when `movement` is wipe motion that stays on the returned-to layer
    pub fn holds(&self, movement: &Movement) -> bool {
        match self {
            Self::Wiping { hop_z } => !movement.is_extruding && movement.to.z == *hop_z,
            _ => false,
        }
    }

    /// Leave the wiping state; other states are unchanged
    pub fn release(self) -> Self {
        match self {
            Self::Wiping { .. } => Self::Idle,
            other => other,
        }
    }

    pub fn pending_z(&self) -> Option<f64> {
        match self {
            Self::Pending { z } => Some(*z),
            _ => None,
        }
    }
}

/// Builds the ordered layer list for one run
#[derive(Debug, Clone, Default)]
pub struct LayerAccumulator {
    layers: Vec<Layer>,
    current: Option<usize>,
    has_extruded: bool,
    retraction: RetractionState,
}

impl LayerAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a movement to the current layer, opening a new one on a Z change
    pub fn record_movement(&mut self, movement: Movement) {
        let mut index = self.ensure_current();

        // wipe travel at the hop height stays on the layer the wipe returned to
        if !self.retraction.holds(&movement) {
            self.retraction = self.retraction.release();
            if let Some(z) = self.layers[index].z {
                if self.has_extruded && movement.to.z != z {
                    index = self.push_layer(Layer::at(movement.to.z));
                    self.current = Some(index);
                }
            }
        }

        let deposits = movement.deposits_material();
        let layer = &mut self.layers[index];
        if layer.z.is_none() && deposits {
            debug!("Layer {} fixed at z={}", index, movement.to.z);
            layer.z = Some(movement.to.z);
        }
        layer.movements.push(movement);

        if deposits {
            self.has_extruded = true;
        }
    }

    /// Record an in-place extrusion on the current layer
    pub fn record_purge(&mut self, position: Position) {
        let index = self.ensure_current();
        self.layers[index].purges.push(PurgePoint { position });
    }

    /// Remember the height of a retraction until the next wipe
    pub fn on_retraction(&mut self, position: Position) {
        self.retraction = self.retraction.retract(position.z);
    }

    /// Return to the layer at the pending retraction height, if any
    ///
    /// `position` is where the nozzle is when the wipe starts.
    pub fn on_wipe(&mut self, position: Position) {
        let (next, target) = self.retraction.wipe(position.z);
        self.retraction = next;
        let Some(z) = target else {
            return;
        };

        let existing = self.layers.iter().rposition(|layer| layer.z == Some(z));
        let index = match existing {
            Some(index) => index,
            None => self.push_layer(Layer::at(z)),
        };
        if self.current != Some(index) {
            debug!("Wipe returns to layer {} at z={}", index, z);
        }
        self.current = Some(index);
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_layer(&self) -> Option<&Layer> {
        self.current.and_then(|index| self.layers.get(index))
    }

    /// True once a non-purge extrusion has been recorded
    pub fn has_extruded(&self) -> bool {
        self.has_extruded
    }

    pub fn retraction(&self) -> RetractionState {
        self.retraction
    }

    /// Hand the layers to the caller
    pub fn finish(self) -> Vec<Layer> {
        self.layers
    }

    fn ensure_current(&mut self) -> usize {
        match self.current {
            Some(index) => index,
            None => {
                let index = self.push_layer(Layer::pending());
                self.current = Some(index);
                index
            }
        }
    }

    fn push_layer(&mut self, layer: Layer) -> usize {
        debug!("Creating layer {} (z={:?})", self.layers.len(), layer.z);
        self.layers.push(layer);
        self.layers.len() - 1
    }
}
