//! The 1D/2D coordinate+data result type the embedding application consumes.

use serde::{Deserialize, Serialize};

/// A named scientific dataset: row-major data with one coordinate vector
/// per dimension.
///
/// Shape is one or two integers; `data.len()` always equals the product of
/// the shape, and `axes.len()` equals `shape.len()`. Constructed by the
/// sheet assembler (or deserialized from JSON by the CLI), never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScientificArray {
    pub name:  String,
    pub shape: Vec<usize>,
    pub axes:  Vec<Vec<f64>>,
    pub data:  Vec<f64>,
}

impl ScientificArray {
    /// A 1D dataset: one coordinate axis plus values.
    pub fn one_dim(name: String, axis: Vec<f64>, data: Vec<f64>) -> Self {
        Self {
            name,
            shape: vec![data.len()],
            axes:  vec![axis],
            data,
        }
    }

    /// A 2D dataset on the grid `cx` × `cy`, `data` row-major with the
    /// second coordinate varying fastest.
    pub fn two_dim(name: String, cx: Vec<f64>, cy: Vec<f64>, data: Vec<f64>) -> Self {
        Self {
            name,
            shape: vec![cx.len(), cy.len()],
            axes:  vec![cx, cy],
            data,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.shape.len()
    }

    pub fn elements(&self) -> usize {
        self.data.len()
    }

    /// Element at a multi-dimensional index, if in bounds.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0usize;
        for (i, (&idx, &dim)) in index.iter().zip(self.shape.iter()).enumerate() {
            if idx >= dim {
                return None;
            }
            flat = if i == 0 { idx } else { flat * dim + idx };
        }
        self.data.get(flat).copied()
    }
}
