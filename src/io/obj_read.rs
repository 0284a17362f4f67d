// src/io/obj_read.rs

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;

use crate::error::MeshError;
use crate::terrain::mesh::{ColumnMesh, Face};

/// Parses a tile OBJ file. Only `v` and `f` directives are meaningful;
/// comments and unrecognized prefixes are ignored. Any unparsable record is
/// fatal.
pub fn read_obj<P: AsRef<Path>>(path: P) -> Result<ColumnMesh, MeshError> {
    let file = File::open(path)?;
    parse_obj(BufReader::new(file))
}

pub fn parse_obj<R: BufRead>(reader: R) -> Result<ColumnMesh, MeshError> {
    let mut mesh = ColumnMesh::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let x = parse_coord(parts.next(), number, &line)?;
                let y = parse_coord(parts.next(), number, &line)?;
                let z = parse_coord(parts.next(), number, &line)?;
                mesh.vertices.push(Point3::new(x, y, z));
            }
            Some("f") => {
                let mut face = Face::new();
                for token in parts {
                    // A token may carry /texture/normal suffixes; only the
                    // vertex index matters.
                    let index_part = token.split('/').next().unwrap_or("");
                    let index: usize = index_part
                        .parse()
                        .map_err(|_| malformed(number, &line))?;
                    if index == 0 || index > mesh.vertices.len() {
                        return Err(malformed(number, &line));
                    }
                    face.push((index - 1) as u32);
                }
                if face.len() < 3 {
                    return Err(malformed(number, &line));
                }
                mesh.faces.push(face);
            }
            _ => {}
        }
    }
    Ok(mesh)
}

fn parse_coord(token: Option<&str>, line: usize, content: &str) -> Result<f64, MeshError> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| malformed(line, content))
}

fn malformed(line: usize, content: &str) -> MeshError {
    MeshError::MalformedRecord { line, content: content.to_string() }
}
