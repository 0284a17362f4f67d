// src/terrain/mesh.rs

use std::collections::BTreeMap;

use nalgebra::Point3;

use crate::terrain::coords::{GridSpec, PosKey};

/// Ordered vertex indices with consistent outward winding. The mesher emits
/// quads; triangles are accepted on read.
pub type Face = Vec<u32>;

/// One histogram column: an axis-aligned box over a grid cell, base at 0.
#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub center_x: f64,
    pub center_z: f64,
    pub height: f64,
    pub half_width: f64,
}

/// Box geometry as flat vertex/face arrays. Boxes never share vertices, so
/// a mesh of n columns holds exactly 8n vertices and 6n faces.
#[derive(Clone, Debug, Default)]
pub struct ColumnMesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Face>,
}

impl ColumnMesh {
    pub fn with_capacity(columns: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(columns * 8),
            faces: Vec::with_capacity(columns * 6),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Index of the highest vertex; the first one wins on ties.
    pub fn argmax_vertex(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, v) in self.vertices.iter().enumerate() {
            match best {
                Some(b) if v.y <= self.vertices[b].y => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Groups vertex indices by the grid cell their (x, z) snaps to. The key
    /// is the quantized cell-center position, so every vertex of one column
    /// lands in the same group.
    pub fn group_columns(&self, grid: &GridSpec) -> BTreeMap<PosKey, Vec<u32>> {
        let mut groups: BTreeMap<PosKey, Vec<u32>> = BTreeMap::new();
        for (i, v) in self.vertices.iter().enumerate() {
            let cell = grid.snap(v.x, v.z);
            let key = PosKey::quantize(grid.world_x(cell.col), grid.world_z(cell.row));
            groups.entry(key).or_default().push(i as u32);
        }
        groups
    }
}
