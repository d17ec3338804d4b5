//! Layer registry with a project wide dirty flag

use crate::{Layer, LayerId};

#[derive(Debug, Default)]
pub struct Project {
    layers: Vec<Layer>,
    is_dirty: bool,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = layer.id();
        self.layers.push(layer);
        self.is_dirty = true;
        id
    }

    /// Take a layer out of the project. Anything still referring to `id`
    /// has to be dropped by the caller.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let index = self.layers.iter().position(|layer| layer.id() == id)?;
        self.is_dirty = true;
        Some(self.layers.remove(index))
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.is_dirty = dirty;
    }
}
