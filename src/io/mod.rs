//! Tile serialization in the ASCII mesh exchange format: `v x y z` vertex
//! records and `f i1 i2 i3 [i4]` faces with 1-based indices.

mod obj_read;
mod obj_write;

pub use obj_read::{parse_obj, read_obj};
pub use obj_write::{tile_filename, write_obj, write_tiles};
