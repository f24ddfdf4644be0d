//! Crispen LUT — preset-driven 3D LUT generation.
//!
//! A preset is an ordered list of color-correction steps. This crate parses
//! the steps, evaluates them over an N×N×N RGB lattice, and serializes the
//! result as a `.cube` file. No GPU or framework dependencies.

pub mod color;
pub mod error;
pub mod lut;
pub mod pipeline;
pub mod preset;
pub mod targeting;

// Re-exports for convenience.
pub use error::{LutError, Result};
pub use lut::{CubeArtifact, DEFAULT_LUT_SIZE, LutTable, build_table};
pub use pipeline::{Pipeline, PipelineState, Step, StepDescriptor};
pub use preset::{GenerateOptions, Preset, PresetCatalog, generate, generate_to_file};
