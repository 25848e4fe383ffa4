//! Layer stack entity - Scene tiles stacked on top of each other
//!
//! A stack holds scene tiles covering the same area, such as the floors of a
//! tower. Exactly one of them is raised and populated at a time; cycling moves
//! the active layer up or down the stack, wrapping at either end.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PlaceholderId;

/// One tile in the stack, with the z it had when the stack was built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub placeholder_id: PlaceholderId,
    pub z: i64,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStack {
    pub layers: Vec<LayerEntry>,
}

impl LayerStack {
    /// Build a stack ordered bottom to top by `z`, nothing active
    pub fn new(mut layers: Vec<LayerEntry>) -> Self {
        for layer in &mut layers {
            layer.active = false;
        }
        layers.sort_by_key(|layer| layer.z);
        Self { layers }
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Index of the active layer
    ///
    /// With nothing active, the top layer counts as active when moving up and
    /// the bottom one when moving down, so the first step lands on an end.
    pub fn current_index(&self, forward: bool) -> Option<usize> {
        if self.layers.is_empty() {
            return None;
        }
        let fallback = if forward { self.layers.len() - 1 } else { 0 };
        Some(
            self.layers
                .iter()
                .position(|layer| layer.active)
                .unwrap_or(fallback),
        )
    }

    /// Index of the layer after `current`, wrapping around
    pub fn next_index(&self, current: usize, forward: bool) -> usize {
        let len = self.layers.len();
        if forward {
            (current + 1) % len
        } else if current == 0 {
            len - 1
        } else {
            current - 1
        }
    }

    /// Highest z recorded in the stack
    pub fn max_z(&self) -> i64 {
        self.layers.iter().map(|layer| layer.z).max().unwrap_or(0).max(0)
    }

    pub fn set_active(&mut self, index: usize) {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.active = i == index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(zs: &[i64]) -> LayerStack {
        LayerStack::new(
            zs.iter()
                .map(|&z| LayerEntry {
                    placeholder_id: PlaceholderId::new(),
                    z,
                    active: true,
                })
                .collect(),
        )
    }

    #[test]
    fn test_new_sorts_by_z_and_deactivates() {
        let stack = stack(&[30, 10, 20]);
        let zs: Vec<i64> = stack.layers.iter().map(|l| l.z).collect();
        assert_eq!(zs, vec![10, 20, 30]);
        assert!(stack.layers.iter().all(|l| !l.active));
    }

    #[test]
    fn test_first_step_wraps_to_an_end() {
        let stack = stack(&[1, 2, 3]);

        let current = stack.current_index(true).unwrap();
        assert_eq!(current, 2);
        assert_eq!(stack.next_index(current, true), 0);

        let current = stack.current_index(false).unwrap();
        assert_eq!(current, 0);
        assert_eq!(stack.next_index(current, false), 2);
    }

    #[test]
    fn test_cycle_follows_active_layer() {
        let mut stack = stack(&[1, 2, 3]);
        stack.set_active(1);

        assert_eq!(stack.current_index(true), Some(1));
        assert_eq!(stack.next_index(1, true), 2);
        assert_eq!(stack.next_index(1, false), 0);
    }

    #[test]
    fn test_max_z_never_negative() {
        assert_eq!(stack(&[-4, -2]).max_z(), 0);
        assert_eq!(stack(&[5, 9]).max_z(), 9);
        assert_eq!(LayerStack::default().current_index(true), None);
    }
}
