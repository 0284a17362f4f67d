// src/config.rs

use crate::terrain::stitch::SeamStrategy;

/// Everything one pipeline run is parameterized by. A CLI or config file
/// layer sits outside this crate and fills this in.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Samples per grid side.
    pub grid_size: usize,
    /// World half-extent; the grid spans `[-extent, extent]²`.
    pub extent: f64,
    /// None picks a time-derived seed and logs it.
    pub seed: Option<u64>,
    /// Minimum cell height for a column to be meshed.
    pub threshold: f64,
    /// Column width as a fraction of grid spacing.
    pub gap_factor: f64,
    /// Tile files are named `<stem>_<quadrant>.obj`.
    pub output_stem: String,
    pub seam_strategy: SeamStrategy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grid_size: 40,
            extent: 3.0,
            seed: None,
            threshold: 0.1,
            gap_factor: 0.8,
            output_stem: "mountain".to_string(),
            seam_strategy: SeamStrategy::SharedColumn,
        }
    }
}
