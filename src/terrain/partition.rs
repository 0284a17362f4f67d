// src/terrain/partition.rs

use std::collections::HashMap;

use log::{debug, warn};
use nalgebra::Point3;

use crate::terrain::coords::GridSpec;
use crate::terrain::mesh::{ColumnMesh, Face};

/// Boundary coordinate the mesh is cut at, derived from the grid cell
/// nearest the global height-argmax — not the geometric center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitPoint {
    pub x: f64,
    pub z: f64,
}

/// One of the four tile regions. `≥ split` classifies east on x and north
/// on z, so the four quadrants cover the plane disjointly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthEast,
    NorthWest,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthEast,
        Quadrant::NorthWest,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Quadrant::NorthEast => "north_east",
            Quadrant::NorthWest => "north_west",
            Quadrant::SouthWest => "south_west",
            Quadrant::SouthEast => "south_east",
        }
    }

    pub fn classify(x: f64, z: f64, split: SplitPoint) -> Quadrant {
        match (x < split.x, z < split.z) {
            (false, false) => Quadrant::NorthEast,
            (true, false) => Quadrant::NorthWest,
            (true, true) => Quadrant::SouthWest,
            (false, true) => Quadrant::SouthEast,
        }
    }

    fn index(self) -> usize {
        match self {
            Quadrant::NorthEast => 0,
            Quadrant::NorthWest => 1,
            Quadrant::SouthWest => 2,
            Quadrant::SouthEast => 3,
        }
    }
}

/// One spatial tile: compacted vertices, remapped faces, and the old→new
/// index map built during compaction. Built fresh per partition run.
#[derive(Clone, Debug)]
pub struct Tile {
    pub quadrant: Quadrant,
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Face>,
    pub index_map: HashMap<u32, u32>,
}

impl Tile {
    fn new(quadrant: Quadrant) -> Self {
        Self {
            quadrant,
            vertices: Vec::new(),
            faces: Vec::new(),
            index_map: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }
}

/// The four tiles of one partition run.
#[derive(Clone, Debug)]
pub struct TileSet {
    tiles: [Tile; 4],
}

impl TileSet {
    fn new() -> Self {
        Self {
            tiles: Quadrant::ALL.map(Tile::new),
        }
    }

    pub fn get(&self, quadrant: Quadrant) -> &Tile {
        &self.tiles[quadrant.index()]
    }

    pub fn get_mut(&mut self, quadrant: Quadrant) -> &mut Tile {
        &mut self.tiles[quadrant.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

/// Splits a column mesh into quadrant tiles around the summit.
pub struct Partitioner {
    grid: GridSpec,
}

impl Partitioner {
    pub fn new(grid: GridSpec) -> Self {
        Self { grid }
    }

    /// The highest vertex's (x, z), rounded to the nearest grid-spacing
    /// multiple on each axis. None for an empty mesh.
    ///
    /// This is the argmax of the textured field: surface noise can shift it
    /// off the configured peak center, so callers must use this value and
    /// never the configured coordinate.
    pub fn split_point(&self, mesh: &ColumnMesh) -> Option<SplitPoint> {
        let highest = mesh.argmax_vertex()?;
        let v = mesh.vertices[highest];
        debug!("highest vertex at ({:.5}, {:.5}, {:.5})", v.x, v.y, v.z);
        Some(SplitPoint {
            x: self.grid.snap_to_spacing(v.x),
            z: self.grid.snap_to_spacing(v.z),
        })
    }

    /// Classifies every vertex into exactly one tile, keeps a face iff all
    /// of its vertices classified into the same tile, and remaps kept faces
    /// through each tile's compacted index space. Straddling faces are
    /// dropped here; the seam stitcher repairs the resulting gap.
    pub fn partition(&self, mesh: &ColumnMesh, split: SplitPoint) -> TileSet {
        let mut tiles = TileSet::new();
        for tile in &mut tiles.tiles {
            tile.vertices.reserve(mesh.vertices.len() / 4);
            tile.faces.reserve(mesh.faces.len() / 4);
        }

        for (i, v) in mesh.vertices.iter().enumerate() {
            let tile = tiles.get_mut(Quadrant::classify(v.x, v.z, split));
            let new_index = tile.vertices.len() as u32;
            tile.vertices.push(*v);
            tile.index_map.insert(i as u32, new_index);
        }

        let mut dropped = 0usize;
        for face in &mesh.faces {
            let Some(&first) = face.first() else {
                continue;
            };
            let v = mesh.vertices[first as usize];
            let quadrant = Quadrant::classify(v.x, v.z, split);
            let remapped: Option<Face> = {
                let map = &tiles.get(quadrant).index_map;
                face.iter().map(|i| map.get(i).copied()).collect()
            };
            match remapped {
                Some(f) => tiles.get_mut(quadrant).faces.push(f),
                None => dropped += 1,
            }
        }
        debug!("partition dropped {dropped} straddling faces");

        for tile in tiles.iter() {
            if tile.is_empty() {
                warn!("tile {} is empty after partition", tile.quadrant.name());
            }
        }
        tiles
    }
}
