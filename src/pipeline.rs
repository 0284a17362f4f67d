// src/pipeline.rs

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::PipelineConfig;
use crate::error::MeshError;
use crate::io;
use crate::terrain::coords::GridSpec;
use crate::terrain::generator::{ColumnMesher, HeightFieldGenerator};
use crate::terrain::partition::{Partitioner, Quadrant, SplitPoint};
use crate::terrain::stitch::{SeamStitcher, StitchReport};

#[derive(Clone, Debug)]
pub struct TileStats {
    pub quadrant: Quadrant,
    pub vertex_count: usize,
    pub face_count: usize,
}

/// What one run produced, for callers that want more than files on disk.
#[derive(Clone, Debug)]
pub struct PipelineSummary {
    pub seed: u64,
    pub column_count: usize,
    pub split: Option<SplitPoint>,
    pub tiles: Vec<TileStats>,
    pub stitch: Option<StitchReport>,
    pub written: Vec<PathBuf>,
}

/// Runs the full pipeline: synthesize → mesh → partition → stitch → write,
/// sequentially and deterministically for a pinned seed.
pub fn run(config: &PipelineConfig, out_dir: &Path) -> Result<PipelineSummary, MeshError> {
    let grid = GridSpec::new(config.grid_size, config.extent);
    let generator = match config.seed {
        Some(seed) => HeightFieldGenerator::new(seed),
        None => HeightFieldGenerator::from_entropy(),
    };
    let seed = generator.seed();

    info!(
        "generating {size}x{size} height field (seed {seed})",
        size = config.grid_size
    );
    let field = generator.generate(grid);

    let mesher = ColumnMesher::new(config.threshold).with_gap_factor(config.gap_factor);
    let mesh = mesher.mesh(&field);
    let column_count = mesh.vertices.len() / 8;
    info!(
        "meshed {column_count} columns ({} vertices, {} faces)",
        mesh.vertices.len(),
        mesh.faces.len()
    );

    let partitioner = Partitioner::new(grid);
    let Some(split) = partitioner.split_point(&mesh) else {
        warn!("no geometry to partition; nothing written");
        return Ok(PipelineSummary {
            seed,
            column_count: 0,
            split: None,
            tiles: Vec::new(),
            stitch: None,
            written: Vec::new(),
        });
    };
    info!("split point at ({:.5}, {:.5})", split.x, split.z);

    let mut tiles = partitioner.partition(&mesh, split);
    let stitcher = SeamStitcher::new(grid, config.seam_strategy);
    let stitch = stitcher.stitch(&mesh, &mut tiles, split);

    let written = io::write_tiles(out_dir, &config.output_stem, &tiles)?;
    let tile_stats = tiles
        .iter()
        .map(|tile| TileStats {
            quadrant: tile.quadrant,
            vertex_count: tile.vertices.len(),
            face_count: tile.faces.len(),
        })
        .collect();

    Ok(PipelineSummary {
        seed,
        column_count,
        split: Some(split),
        tiles: tile_stats,
        stitch: Some(stitch),
        written,
    })
}
