// src/terrain/stitch.rs

use std::collections::{BTreeMap, HashSet};

use log::{debug, warn};
use nalgebra::Point3;

use crate::terrain::coords::{GridSpec, PosKey, POS_TOLERANCE};
use crate::terrain::mesh::{ColumnMesh, Face};
use crate::terrain::partition::{Quadrant, SplitPoint, Tile, TileSet};

/// How a partition run's boundary gaps get repaired. The two strategies have
/// conflicting preconditions, so exactly one runs per partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeamStrategy {
    /// Complete every column whose center lies on a split line in both
    /// bordering tiles. Requires the cut to fall on a column of grid
    /// centers.
    SharedColumn,
    /// Synthesize quads between the two sorted boundary-vertex collections
    /// of each adjacent tile pair. Requires a 1:1 boundary-vertex count,
    /// which holds only when both tiles were meshed at the same grid
    /// resolution.
    Bridge,
}

/// Axis a cut line runs perpendicular to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

/// A boundary the stitcher had to leave alone, with enough detail to
/// diagnose why.
#[derive(Clone, Debug)]
pub enum BoundaryIssue {
    /// Bridging found differing boundary-vertex counts across a cut.
    CountMismatch {
        axis: Axis,
        pair: (Quadrant, Quadrant),
        lower: usize,
        upper: usize,
    },
    /// No column center lies on this split line; the cut falls strictly
    /// between grid lines.
    NoSharedColumns { axis: Axis, line: f64 },
}

/// What one stitch pass did. Issues are warnings, never fatal.
#[derive(Clone, Debug)]
pub struct StitchReport {
    pub strategy: SeamStrategy,
    pub duplicated_columns: usize,
    pub bridge_quads: usize,
    pub issues: Vec<BoundaryIssue>,
}

/// Repairs the gaps strict-containment partitioning leaves along the cut
/// lines.
pub struct SeamStitcher {
    grid: GridSpec,
    strategy: SeamStrategy,
}

impl SeamStitcher {
    pub fn new(grid: GridSpec, strategy: SeamStrategy) -> Self {
        Self { grid, strategy }
    }

    pub fn stitch(
        &self,
        mesh: &ColumnMesh,
        tiles: &mut TileSet,
        split: SplitPoint,
    ) -> StitchReport {
        match self.strategy {
            SeamStrategy::SharedColumn => self.stitch_shared_columns(mesh, tiles, split),
            SeamStrategy::Bridge => self.stitch_bridges(tiles, split),
        }
    }

    /// Completes every on-line column in each tile bordering its split
    /// line: x-line columns east+west, z-line columns north+south, the
    /// column on both lines in all four quadrants. A seen-set guarantees no
    /// tile receives a column twice.
    fn stitch_shared_columns(
        &self,
        mesh: &ColumnMesh,
        tiles: &mut TileSet,
        split: SplitPoint,
    ) -> StitchReport {
        let columns = mesh.group_columns(&self.grid);
        let column_faces = faces_by_column(mesh, &self.grid);
        let half_cell = self.grid.spacing() / 2.0;

        let mut seen: HashSet<(Quadrant, PosKey)> = HashSet::new();
        let mut duplicated = 0usize;
        let mut on_x_line = 0usize;
        let mut on_z_line = 0usize;

        for (key, vertex_ids) in &columns {
            let on_x = (key.x() - split.x).abs() <= POS_TOLERANCE;
            let on_z = (key.z() - split.z).abs() <= POS_TOLERANCE;
            if !on_x && !on_z {
                continue;
            }
            if on_x {
                on_x_line += 1;
            }
            if on_z {
                on_z_line += 1;
            }

            let targets: Vec<Quadrant> = if on_x && on_z {
                Quadrant::ALL.to_vec()
            } else if on_x {
                vec![
                    Quadrant::classify(split.x - half_cell, key.z(), split),
                    Quadrant::classify(split.x + half_cell, key.z(), split),
                ]
            } else {
                vec![
                    Quadrant::classify(key.x(), split.z - half_cell, split),
                    Quadrant::classify(key.x(), split.z + half_cell, split),
                ]
            };

            let faces = column_faces.get(key).map(Vec::as_slice).unwrap_or(&[]);
            for quadrant in targets {
                if seen.insert((quadrant, *key))
                    && complete_column(mesh, tiles.get_mut(quadrant), vertex_ids, faces)
                {
                    duplicated += 1;
                }
            }
        }

        let mut issues = Vec::new();
        if on_x_line == 0 {
            warn!(
                "no column centers on the x split line at {:.5}; boundary left unstitched",
                split.x
            );
            issues.push(BoundaryIssue::NoSharedColumns { axis: Axis::X, line: split.x });
        }
        if on_z_line == 0 {
            warn!(
                "no column centers on the z split line at {:.5}; boundary left unstitched",
                split.z
            );
            issues.push(BoundaryIssue::NoSharedColumns { axis: Axis::Z, line: split.z });
        }
        debug!("shared-column stitch completed {duplicated} column copies");

        StitchReport {
            strategy: SeamStrategy::SharedColumn,
            duplicated_columns: duplicated,
            bridge_quads: 0,
            issues,
        }
    }

    /// Walks each adjacent tile pair's boundary-vertex collections in
    /// lockstep, adding one connecting quad per consecutive pair to both
    /// tiles.
    fn stitch_bridges(&self, tiles: &mut TileSet, split: SplitPoint) -> StitchReport {
        let pairs = [
            (Quadrant::NorthWest, Quadrant::NorthEast, Axis::X),
            (Quadrant::SouthWest, Quadrant::SouthEast, Axis::X),
            (Quadrant::SouthWest, Quadrant::NorthWest, Axis::Z),
            (Quadrant::SouthEast, Quadrant::NorthEast, Axis::Z),
        ];
        let tolerance = self.grid.spacing() / 2.0;

        let mut quads = 0usize;
        let mut issues = Vec::new();
        for (lower, upper, axis) in pairs {
            let line = match axis {
                Axis::X => split.x,
                Axis::Z => split.z,
            };
            let lower_rim = boundary_vertices(tiles.get(lower), axis, line, tolerance);
            let upper_rim = boundary_vertices(tiles.get(upper), axis, line, tolerance);
            if lower_rim.is_empty() && upper_rim.is_empty() {
                continue;
            }
            if lower_rim.len() != upper_rim.len() {
                warn!(
                    "boundary {}/{}: vertex count mismatch ({} vs {}); left unstitched",
                    lower.name(),
                    upper.name(),
                    lower_rim.len(),
                    upper_rim.len()
                );
                issues.push(BoundaryIssue::CountMismatch {
                    axis,
                    pair: (lower, upper),
                    lower: lower_rim.len(),
                    upper: upper_rim.len(),
                });
                continue;
            }
            for i in 0..lower_rim.len().saturating_sub(1) {
                let quad = [
                    lower_rim[i],
                    lower_rim[i + 1],
                    upper_rim[i + 1],
                    upper_rim[i],
                ];
                append_quad(tiles.get_mut(lower), &quad);
                append_quad(tiles.get_mut(upper), &quad);
                quads += 1;
            }
        }
        debug!("bridge stitch added {quads} quads");

        StitchReport {
            strategy: SeamStrategy::Bridge,
            duplicated_columns: 0,
            bridge_quads: quads,
            issues,
        }
    }
}

/// Source-mesh face ids grouped by the column they belong to. Box faces
/// never span columns, so the first vertex decides.
fn faces_by_column(mesh: &ColumnMesh, grid: &GridSpec) -> BTreeMap<PosKey, Vec<usize>> {
    let mut groups: BTreeMap<PosKey, Vec<usize>> = BTreeMap::new();
    for (face_id, face) in mesh.faces.iter().enumerate() {
        let Some(&first) = face.first() else {
            continue;
        };
        let v = mesh.vertices[first as usize];
        let cell = grid.snap(v.x, v.z);
        let key = PosKey::quantize(grid.world_x(cell.col), grid.world_z(cell.row));
        groups.entry(key).or_default().push(face_id);
    }
    groups
}

/// Extends a tile with a column's missing vertices and the faces it does not
/// already hold, remapped through the tile's own index space. Returns true
/// when anything was added.
fn complete_column(
    mesh: &ColumnMesh,
    tile: &mut Tile,
    vertex_ids: &[u32],
    face_ids: &[usize],
) -> bool {
    // Which faces the tile already kept, judged before extending the map.
    let already_kept: Vec<bool> = face_ids
        .iter()
        .map(|&f| {
            mesh.faces[f]
                .iter()
                .all(|i| tile.index_map.contains_key(i))
        })
        .collect();

    for &vi in vertex_ids {
        if !tile.index_map.contains_key(&vi) {
            let new_index = tile.vertices.len() as u32;
            tile.vertices.push(mesh.vertices[vi as usize]);
            tile.index_map.insert(vi, new_index);
        }
    }

    let mut added = false;
    for (&face_id, kept) in face_ids.iter().zip(already_kept) {
        if kept {
            continue;
        }
        let remapped: Face = mesh.faces[face_id]
            .iter()
            .map(|i| tile.index_map[i])
            .collect();
        tile.faces.push(remapped);
        added = true;
    }
    added
}

/// A tile's vertices within tolerance of the cut line, sorted along the
/// perpendicular axis with ties broken by height.
fn boundary_vertices(tile: &Tile, axis: Axis, line: f64, tolerance: f64) -> Vec<Point3<f64>> {
    let along = |v: &Point3<f64>| match axis {
        Axis::X => v.x,
        Axis::Z => v.z,
    };
    let perpendicular = |v: &Point3<f64>| match axis {
        Axis::X => v.z,
        Axis::Z => v.x,
    };
    let mut rim: Vec<Point3<f64>> = tile
        .vertices
        .iter()
        .filter(|v| (along(v) - line).abs() <= tolerance)
        .copied()
        .collect();
    rim.sort_by(|a, b| {
        perpendicular(a)
            .total_cmp(&perpendicular(b))
            .then(a.y.total_cmp(&b.y))
    });
    rim
}

/// Appends a quad with its own fresh vertices; tiles never share a vertex
/// pool.
fn append_quad(tile: &mut Tile, quad: &[Point3<f64>; 4]) {
    let base = tile.vertices.len() as u32;
    tile.vertices.extend_from_slice(quad);
    tile.faces.push(vec![base, base + 1, base + 2, base + 3]);
}
