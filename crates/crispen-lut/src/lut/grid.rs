//! Grid sampler: evaluates a pipeline at every lattice point of an N×N×N cube.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::color::Rgb;
use crate::error::{LutError, Result};
use crate::pipeline::Pipeline;

/// Largest accepted grid size.
pub const MAX_LUT_SIZE: u32 = 256;

/// Input value of lattice `index` on an axis with `size` points.
///
/// Index 0 maps to exactly 0.0 and index `size - 1` to exactly 1.0.
/// Precondition: `size >= 2`. Smaller sizes do not panic but produce a
/// non-finite value; [`build_table`] rejects them before sampling.
pub fn grid_axis(index: u32, size: u32) -> f64 {
    index as f64 / size.saturating_sub(1) as f64
}

/// Number of entries in a `size`³ table, or `InvalidGridSize` when `size`
/// is outside `2..=MAX_LUT_SIZE`.
pub(crate) fn entry_count(size: u32) -> Result<usize> {
    if !(2..=MAX_LUT_SIZE).contains(&size) {
        return Err(LutError::InvalidGridSize(size));
    }
    (size as usize)
        .checked_pow(3)
        .ok_or(LutError::InvalidGridSize(size))
}

/// Dense LUT contents in `.cube` row order: red varies fastest, then green,
/// then blue.
#[derive(Debug, Clone, PartialEq)]
pub struct LutTable {
    size: u32,
    entries: Vec<Rgb>,
}

impl LutTable {
    /// Wrap pre-computed entries. `entries.len()` must equal `size³`.
    pub fn from_entries(size: u32, entries: Vec<Rgb>) -> Result<Self> {
        let expected = entry_count(size)?;
        if entries.len() != expected {
            return Err(LutError::Parse {
                line: 0,
                message: format!("expected {expected} entries for size {size}, found {}", entries.len()),
            });
        }
        Ok(Self { size, entries })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn entries(&self) -> &[Rgb] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at lattice coordinates `(r, g, b)`.
    pub fn get(&self, r: u32, g: u32, b: u32) -> Rgb {
        let n = self.size as usize;
        self.entries[(b as usize * n + g as usize) * n + r as usize]
    }
}

/// Clamp each channel to [0, 1]. NaN becomes 0 and negative zero becomes
/// positive zero, so the serialized text never shows `-0.000000`.
fn clamp_output(rgb: Rgb) -> Rgb {
    rgb.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) + 0.0 })
}

fn sample(pipeline: &Pipeline, strength: f64, size: u32, index: usize) -> Rgb {
    let n = size as usize;
    let r = (index % n) as u32;
    let g = ((index / n) % n) as u32;
    let b = (index / (n * n)) as u32;
    let input = [grid_axis(r, size), grid_axis(g, size), grid_axis(b, size)];
    clamp_output(pipeline.evaluate(input, strength))
}

/// Sample `pipeline` over a `size`³ lattice.
///
/// Blue is the outermost loop, green the middle and red the innermost, which
/// is the row order `.cube` consumers expect. Every output channel is clamped
/// to [0, 1]. Strength outside [0, 1] is extrapolated, not rejected.
pub fn build_table(pipeline: &Pipeline, strength: f64, size: u32) -> Result<LutTable> {
    let total = entry_count(size)?;
    tracing::debug!(size, strength, total, steps = pipeline.steps().len(), "building LUT table");

    #[cfg(feature = "parallel")]
    let entries: Vec<Rgb> = (0..total)
        .into_par_iter()
        .map(|index| sample(pipeline, strength, size, index))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let entries: Vec<Rgb> = (0..total)
        .map(|index| sample(pipeline, strength, size, index))
        .collect();

    Ok(LutTable { size, entries })
}
