//! LUT table construction and `.cube` file I/O.

pub mod cube;
pub mod grid;

pub use cube::CubeArtifact;
pub use grid::{LutTable, MAX_LUT_SIZE, build_table, grid_axis};

/// Grid points per axis when the caller does not choose one.
pub const DEFAULT_LUT_SIZE: u32 = 33;
