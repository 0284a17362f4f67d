// src/io/obj_write.rs

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;
use nalgebra::Point3;

use crate::error::MeshError;
use crate::terrain::mesh::{ColumnMesh, Face};
use crate::terrain::partition::{Quadrant, TileSet};

/// File name for one tile under the configured stem, e.g.
/// `mountain_north_east.obj`.
pub fn tile_filename(stem: &str, quadrant: Quadrant) -> String {
    format!("{stem}_{}.obj", quadrant.name())
}

pub fn write_obj<P: AsRef<Path>>(
    path: P,
    mesh: &ColumnMesh,
    header: Option<&str>,
) -> Result<(), MeshError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_geometry(&mut writer, &mesh.vertices, &mesh.faces, header)?;
    writer.flush()?;
    Ok(())
}

/// Writes one file per non-empty tile into `dir`, returning the written
/// paths. Empty tiles are omitted with a warning; the run continues.
pub fn write_tiles(
    dir: &Path,
    stem: &str,
    tiles: &TileSet,
) -> Result<Vec<PathBuf>, MeshError> {
    let mut written = Vec::new();
    for tile in tiles.iter() {
        if tile.is_empty() {
            warn!("tile {} has no geometry; omitting its file", tile.quadrant.name());
            continue;
        }
        let path = dir.join(tile_filename(stem, tile.quadrant));
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        let header = format!("mountain tile: {}", tile.quadrant.name());
        write_geometry(&mut writer, &tile.vertices, &tile.faces, Some(&header))?;
        writer.flush()?;
        written.push(path);
    }
    Ok(written)
}

/// Vertices first, then 1-based face records. Column meshes carry no
/// normals, so indices are written bare.
fn write_geometry<W: Write>(
    writer: &mut W,
    vertices: &[Point3<f64>],
    faces: &[Face],
    header: Option<&str>,
) -> io::Result<()> {
    if let Some(comment) = header {
        writeln!(writer, "# {comment}")?;
    }
    for v in vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for face in faces {
        write!(writer, "f")?;
        for &index in face {
            write!(writer, " {}", index + 1)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
