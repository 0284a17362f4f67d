use crate::terrain::coords::{GridSpec, PosKey};
use crate::terrain::generator::ColumnMesher;
use crate::terrain::heightfield::HeightField;
use crate::terrain::mesh::ColumnMesh;
use crate::terrain::partition::{Partitioner, Quadrant, SplitPoint, Tile, TileSet};
use crate::terrain::stitch::{Axis, BoundaryIssue, SeamStitcher, SeamStrategy};

fn field_with_heights(grid: GridSpec, cells: &[(usize, usize, f64)]) -> HeightField {
    let mut data = vec![0.0; grid.cell_count()];
    for &(col, row, height) in cells {
        data[row * grid.size() + col] = height;
    }
    HeightField::new(grid, data)
}

fn partitioned(
    grid: GridSpec,
    cells: &[(usize, usize, f64)],
    split: SplitPoint,
) -> (ColumnMesh, TileSet) {
    let field = field_with_heights(grid, cells);
    let mesh = ColumnMesher::new(0.5).mesh(&field);
    let tiles = Partitioner::new(grid).partition(&mesh, split);
    (mesh, tiles)
}

/// Complete column copies of `key` in a tile, counted by top faces: faces
/// whose vertices all sit at the column's height and snap to its cell.
fn column_copies(tile: &Tile, grid: &GridSpec, key: PosKey, height: f64) -> usize {
    tile.faces
        .iter()
        .filter(|face| {
            face.iter().all(|&i| {
                let v = tile.vertices[i as usize];
                let cell = grid.snap(v.x, v.z);
                let cell_key = PosKey::quantize(grid.world_x(cell.col), grid.world_z(cell.row));
                v.y == height && cell_key == key
            })
        })
        .count()
}

#[test]
fn test_shared_column_completes_on_line_column_in_both_tiles() {
    // An 11-sample grid has a column of cell centers exactly on x = 0.
    let grid = GridSpec::new(11, 1.0); // spacing 0.2
    let split = SplitPoint { x: 0.0, z: 0.0 };
    let (mesh, mut tiles) = partitioned(
        grid,
        &[(5, 6, 1.0), (5, 4, 1.0), (4, 5, 1.0), (5, 5, 1.0)],
        split,
    );

    let report = SeamStitcher::new(grid, SeamStrategy::SharedColumn)
        .stitch(&mesh, &mut tiles, split);

    assert!(report.issues.is_empty(), "both split lines fall on columns");
    assert_eq!(report.duplicated_columns, 10);
    assert_eq!(report.bridge_quads, 0);

    // Column at (0, 0.2): on the x line, north side.
    let north_key = PosKey::quantize(0.0, grid.world_z(6));
    assert_eq!(column_copies(tiles.get(Quadrant::NorthWest), &grid, north_key, 1.0), 1);
    assert_eq!(column_copies(tiles.get(Quadrant::NorthEast), &grid, north_key, 1.0), 1);
    assert_eq!(column_copies(tiles.get(Quadrant::SouthWest), &grid, north_key, 1.0), 0);

    // Column at (-0.2, 0): on the z line, west side.
    let west_key = PosKey::quantize(grid.world_x(4), 0.0);
    assert_eq!(column_copies(tiles.get(Quadrant::SouthWest), &grid, west_key, 1.0), 1);
    assert_eq!(column_copies(tiles.get(Quadrant::NorthWest), &grid, west_key, 1.0), 1);

    // Column at the split point itself lands in all four tiles.
    let origin_key = PosKey::quantize(0.0, 0.0);
    for quadrant in Quadrant::ALL {
        assert_eq!(
            column_copies(tiles.get(quadrant), &grid, origin_key, 1.0),
            1,
            "origin column missing or duplicated in {}",
            quadrant.name()
        );
    }
}

#[test]
fn test_shared_column_reports_cut_between_grid_lines() {
    // An even grid has no cell centers on x = 0 or z = 0.
    let grid = GridSpec::new(10, 1.0);
    let split = SplitPoint { x: 0.0, z: 0.0 };
    let (mesh, mut tiles) = partitioned(grid, &[(4, 4, 1.0), (5, 5, 1.0)], split);

    let report = SeamStitcher::new(grid, SeamStrategy::SharedColumn)
        .stitch(&mesh, &mut tiles, split);

    assert_eq!(report.duplicated_columns, 0);
    assert_eq!(report.issues.len(), 2, "both axes should report unstitched cuts");
    assert!(report
        .issues
        .iter()
        .any(|i| matches!(i, BoundaryIssue::NoSharedColumns { axis: Axis::X, .. })));
    assert!(report
        .issues
        .iter()
        .any(|i| matches!(i, BoundaryIssue::NoSharedColumns { axis: Axis::Z, .. })));
}

#[test]
fn test_bridge_connects_matching_boundaries() {
    // One column in each quadrant, all adjacent to the split lines.
    let grid = GridSpec::new(10, 1.0); // spacing 2/9
    let split = SplitPoint { x: 0.0, z: 0.0 };
    let (mesh, mut tiles) = partitioned(
        grid,
        &[(4, 4, 1.0), (5, 4, 1.0), (4, 5, 1.0), (5, 5, 1.0)],
        split,
    );

    let report = SeamStitcher::new(grid, SeamStrategy::Bridge)
        .stitch(&mesh, &mut tiles, split);

    assert!(report.issues.is_empty());
    // Each of the 4 boundary pairs bridges 4 rim vertices with 3 quads.
    assert_eq!(report.bridge_quads, 12);
    assert_eq!(report.duplicated_columns, 0);

    for quadrant in Quadrant::ALL {
        let tile = tiles.get(quadrant);
        // 1 column + 3 quads from each of the two touching boundaries.
        assert_eq!(tile.faces.len(), 6 + 6, "{} face count", quadrant.name());
        assert_eq!(tile.vertices.len(), 8 + 24, "{} vertex count", quadrant.name());
    }
}

#[test]
fn test_bridge_count_mismatch_is_reported_not_stitched() {
    let grid = GridSpec::new(10, 1.0);
    let split = SplitPoint { x: 0.0, z: 0.0 };
    // One column west of the x line, two east of it.
    let (mesh, mut tiles) = partitioned(
        grid,
        &[(4, 5, 1.0), (5, 5, 1.0), (5, 7, 1.0)],
        split,
    );

    let report = SeamStitcher::new(grid, SeamStrategy::Bridge)
        .stitch(&mesh, &mut tiles, split);

    assert_eq!(report.bridge_quads, 0, "mismatched boundaries must not be stitched");
    assert!(report.issues.iter().any(|issue| matches!(
        issue,
        BoundaryIssue::CountMismatch { axis: Axis::X, lower: 4, upper: 8, .. }
    )));
}

#[test]
fn test_stitched_tiles_still_remap_validly() {
    let grid = GridSpec::new(11, 1.0);
    let split = SplitPoint { x: 0.0, z: 0.0 };
    let (mesh, mut tiles) = partitioned(
        grid,
        &[(5, 5, 1.0), (5, 6, 2.0), (6, 5, 1.5)],
        split,
    );

    SeamStitcher::new(grid, SeamStrategy::SharedColumn).stitch(&mesh, &mut tiles, split);

    for tile in tiles.iter() {
        for face in &tile.faces {
            for &i in face {
                assert!(
                    (i as usize) < tile.vertices.len(),
                    "stitched face references missing vertex in {}",
                    tile.quadrant.name()
                );
            }
        }
    }
}
