//! Scenarios and their layer stacks
//!
//! A [`Scenario`] owns its layers outright; nothing points back at it. Display
//! order is ascending priority, with ties resolved by insertion order, and
//! [`Scenario::ordered_layers`] is the single source of that order for both
//! the compositor and the layer list.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ModelError;
use crate::layer::{Layer, LayerId};
use crate::offset::Offset;

/// A named comparison session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub timestamp: SystemTime,
    layers: Vec<Layer>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, timestamp: SystemTime) -> Self {
        Self {
            name: name.into(),
            timestamp,
            layers: Vec::new(),
        }
    }

    /// Layers in insertion order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layer(id).is_some()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }

    /// Layers sorted by ascending priority
    ///
    /// The returned iterator is cheap to clone, so it can be walked more than
    /// once. Reversing it yields the topmost layer first.
    pub fn ordered_layers(&self) -> OrderedLayers<'_> {
        let mut order: SmallVec<[usize; 8]> = (0..self.layers.len()).collect();
        // Stable sort keeps insertion order among equal priorities
        order.sort_by_key(|&index| self.layers[index].priority());
        OrderedLayers {
            layers: &self.layers,
            order,
            front: 0,
            back: self.layers.len(),
        }
    }

    /// Layers as an inspector list shows them: topmost first
    pub fn layer_list(&self) -> std::iter::Rev<OrderedLayers<'_>> {
        self.ordered_layers().rev()
    }

    /// Priorities in display order
    pub fn priorities(&self) -> Vec<i32> {
        self.ordered_layers().map(Layer::priority).collect()
    }

    /// Display position of a layer
    pub fn position(&self, id: LayerId) -> Option<usize> {
        self.ordered_layers().position(|layer| layer.id() == id)
    }

    // === Mutation ===

    /// Append a layer with the given priority
    pub fn insert(&mut self, layer: Layer, priority: i32) -> Result<LayerId, ModelError> {
        let id = layer.id();
        if self.contains(id) {
            return Err(ModelError::DuplicateLayer(id));
        }
        self.layers.push(layer.with_priority(priority));
        Ok(id)
    }

    /// Append a batch of layers in one step, keeping their priorities
    ///
    /// Either every layer is appended or, on a duplicate id, none are.
    pub fn append_layers(&mut self, batch: Vec<Layer>) -> Result<(), ModelError> {
        for (index, layer) in batch.iter().enumerate() {
            let id = layer.id();
            if self.contains(id) || batch[..index].iter().any(|other| other.id() == id) {
                return Err(ModelError::DuplicateLayer(id));
            }
        }
        self.layers.extend(batch);
        Ok(())
    }

    /// Move the layer at display position `from` to display position `to`
    ///
    /// Afterwards every priority equals its display position, so priorities
    /// are always `0..len` with no duplicates.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), ModelError> {
        let len = self.layers.len();
        for index in [from, to] {
            if index >= len {
                return Err(ModelError::IndexOutOfRange { index, len });
            }
        }

        self.layers.sort_by_key(Layer::priority);
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        for (position, layer) in self.layers.iter_mut().enumerate() {
            layer.set_priority(position as i32);
        }
        Ok(())
    }

    /// [`Scenario::reorder`] using positions in [`Scenario::layer_list`]
    pub fn reorder_in_list(&mut self, from: usize, to: usize) -> Result<(), ModelError> {
        let len = self.layers.len();
        for index in [from, to] {
            if index >= len {
                return Err(ModelError::IndexOutOfRange { index, len });
            }
        }
        self.reorder(len - 1 - from, len - 1 - to)
    }

    pub fn set_hidden(&mut self, id: LayerId, hidden: bool) -> Result<(), ModelError> {
        let layer = self.layer_mut(id).ok_or(ModelError::LayerNotFound(id))?;
        layer.hidden = hidden;
        Ok(())
    }

    /// Flip visibility, returning the new `hidden` value
    pub fn toggle_hidden(&mut self, id: LayerId) -> Result<bool, ModelError> {
        let layer = self.layer_mut(id).ok_or(ModelError::LayerNotFound(id))?;
        layer.hidden = !layer.hidden;
        Ok(layer.hidden)
    }

    pub fn set_offset(&mut self, id: LayerId, offset: Offset) -> Result<(), ModelError> {
        let layer = self.layer_mut(id).ok_or(ModelError::LayerNotFound(id))?;
        layer.offset = offset;
        Ok(())
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer, ModelError> {
        let index = self
            .layers
            .iter()
            .position(|layer| layer.id() == id)
            .ok_or(ModelError::LayerNotFound(id))?;
        Ok(self.layers.remove(index))
    }

    /// Drop every layer, returning their ids
    pub(crate) fn take_layer_ids(&mut self) -> Vec<LayerId> {
        self.layers.drain(..).map(|layer| layer.id()).collect()
    }
}

/// Iterator over a scenario's layers in display order
#[derive(Debug, Clone)]
pub struct OrderedLayers<'a> {
    layers: &'a [Layer],
    order: SmallVec<[usize; 8]>,
    front: usize,
    back: usize,
}

impl<'a> Iterator for OrderedLayers<'a> {
    type Item = &'a Layer;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let layer = &self.layers[self.order[self.front]];
        self.front += 1;
        Some(layer)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for OrderedLayers<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(&self.layers[self.order[self.back]])
    }
}

impl ExactSizeIterator for OrderedLayers<'_> {}
