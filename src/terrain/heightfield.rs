// src/terrain/heightfield.rs

use crate::terrain::coords::{CellCoords, GridSpec};

/// Immutable elevation grid. Heights are non-negative everywhere and exactly
/// zero within the border margin; produced once by the synthesizer, read-only
/// thereafter.
#[derive(Clone, Debug)]
pub struct HeightField {
    grid: GridSpec,
    data: Vec<f64>,
}

impl HeightField {
    pub(crate) fn new(grid: GridSpec, data: Vec<f64>) -> Self {
        assert!(data.len() == grid.cell_count());
        Self { grid, data }
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn get(&self, col: usize, row: usize) -> f64 {
        self.data[row * self.grid.size() + col]
    }

    pub fn max_height(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Cell holding the global maximum; the first one in row-major order
    /// wins on ties.
    pub fn argmax(&self) -> CellCoords {
        let mut best = 0;
        for (i, &h) in self.data.iter().enumerate() {
            if h > self.data[best] {
                best = i;
            }
        }
        CellCoords {
            col: best % self.grid.size(),
            row: best / self.grid.size(),
        }
    }

    pub(crate) fn data(&self) -> &[f64] {
        &self.data
    }
}
