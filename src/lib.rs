// src/lib.rs

//! Procedural mountain terrain as histogram block meshes.
//!
//! A height field is synthesized from layered peak features, meshed into one
//! axis-aligned column per grid cell, partitioned into quadrant tiles around
//! the summit, seam-stitched along the cut lines, and written as one OBJ
//! file per tile.

pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod terrain;

pub use config::PipelineConfig;
pub use error::MeshError;
