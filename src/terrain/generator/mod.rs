mod heightfield;
mod mesh;

pub use heightfield::{HeightFieldGenerator, BORDER_MARGIN};
pub use mesh::{ColumnMesher, DEFAULT_GAP_FACTOR};

#[cfg(test)]
mod tests;
