// src/terrain/generator/mesh.rs

use log::{debug, warn};

use crate::terrain::heightfield::HeightField;
use crate::terrain::mesh::{Column, ColumnMesh};

/// Column width as a fraction of grid spacing; slightly under 1 leaves a
/// visible gap between adjacent boxes.
pub const DEFAULT_GAP_FACTOR: f64 = 0.8;

/// Converts a height field into histogram boxes, one per cell at or above
/// the inclusion threshold.
pub struct ColumnMesher {
    threshold: f64,
    gap_factor: f64,
}

impl ColumnMesher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold, gap_factor: DEFAULT_GAP_FACTOR }
    }

    /// 1.0 makes adjacent columns touch exactly.
    pub fn with_gap_factor(mut self, gap_factor: f64) -> Self {
        self.gap_factor = gap_factor;
        self
    }

    pub fn mesh(&self, field: &HeightField) -> ColumnMesh {
        let max = field.max_height();
        if self.threshold > max {
            warn!(
                "column threshold {} exceeds field maximum {max}; emitting empty mesh",
                self.threshold
            );
            return ColumnMesh::default();
        }

        let grid = field.grid();
        let width = grid.spacing() * self.gap_factor;
        let size = grid.size();

        let included = field
            .data()
            .iter()
            .filter(|&&h| h >= self.threshold)
            .count();
        let mut mesh = ColumnMesh::with_capacity(included);

        for row in 0..size {
            for col in 0..size {
                let height = field.get(col, row);
                if height < self.threshold {
                    continue;
                }
                let column = Column {
                    center_x: grid.world_x(col),
                    center_z: grid.world_z(row),
                    height,
                    half_width: width / 2.0,
                };
                emit_box(&mut mesh, &column);
            }
        }

        debug!(
            "meshed {included} columns ({} vertices, {} faces)",
            mesh.vertices.len(),
            mesh.faces.len()
        );
        mesh
    }
}

/// Appends a column's 8 vertices (bottom ring, then top ring) and its 6
/// outward-facing quads.
fn emit_box(mesh: &mut ColumnMesh, column: &Column) {
    let base = mesh.vertices.len() as u32;
    let x0 = column.center_x - column.half_width;
    let x1 = column.center_x + column.half_width;
    let z0 = column.center_z - column.half_width;
    let z1 = column.center_z + column.half_width;
    let y = column.height;

    mesh.vertices.push([x0, 0.0, z0].into());
    mesh.vertices.push([x1, 0.0, z0].into());
    mesh.vertices.push([x1, 0.0, z1].into());
    mesh.vertices.push([x0, 0.0, z1].into());
    mesh.vertices.push([x0, y, z0].into());
    mesh.vertices.push([x1, y, z0].into());
    mesh.vertices.push([x1, y, z1].into());
    mesh.vertices.push([x0, y, z1].into());

    mesh.faces.push(vec![base, base + 1, base + 2, base + 3]); // bottom
    mesh.faces.push(vec![base + 4, base + 7, base + 6, base + 5]); // top
    mesh.faces.push(vec![base, base + 4, base + 5, base + 1]); // z = z0
    mesh.faces.push(vec![base + 1, base + 5, base + 6, base + 2]); // x = x1
    mesh.faces.push(vec![base + 2, base + 6, base + 7, base + 3]); // z = z1
    mesh.faces.push(vec![base + 3, base + 7, base + 4, base]); // x = x0
}
