//! Pipeline runner: folds an ordered list of steps over one input color.

pub mod descriptor;
mod state;
pub mod steps;

pub use descriptor::{ParamValue, StepDescriptor};
pub use state::PipelineState;
pub use steps::Step;

use crate::color::Rgb;
use crate::error::{LutError, Result};

/// An ordered, fully validated list of steps.
///
/// Order is preserved exactly as given; steps are never reordered or
/// deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    /// Parse every descriptor up front. The first unknown step type or
    /// missing parameter aborts the whole pipeline.
    pub fn from_descriptors(descriptors: &[StepDescriptor]) -> Result<Self> {
        if descriptors.is_empty() {
            return Err(LutError::EmptyPipeline);
        }
        let steps = descriptors
            .iter()
            .map(Step::from_descriptor)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            steps = steps.len(),
            kinds = ?steps.iter().map(Step::name).collect::<Vec<_>>(),
            "parsed pipeline"
        );
        Ok(Self { steps })
    }

    pub fn from_steps(steps: Vec<Step>) -> Result<Self> {
        if steps.is_empty() {
            return Err(LutError::EmptyPipeline);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether any step ignores strength, making strength 0 only an
    /// approximate identity.
    pub fn has_fixed_steps(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step, Step::HighlightProtect(_)))
    }

    /// Run the pipeline on one color.
    ///
    /// The state is seeded from `rgb` (with `orig_l` equal to the input
    /// luminance) and threaded through every step in order. The last step's
    /// RGB output is returned unclamped.
    pub fn evaluate(&self, rgb: Rgb, strength: f64) -> Rgb {
        let seed = (rgb, PipelineState::from_rgb(rgb));
        let (out, _) = self
            .steps
            .iter()
            .fold(seed, |(rgb, state), step| step.apply(rgb, state, strength));
        out
    }
}
