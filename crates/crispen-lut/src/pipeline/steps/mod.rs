//! Step engine: one typed record per step type and the dispatch between them.
//!
//! Every step is a pure function `(rgb, state, strength) -> (rgb', state')`.
//! Strength pulls each interpolated parameter toward its neutral value:
//!
//! ```text
//!   Factor (neutral 1):  actual = 1 + (target − 1)·strength
//!   Amount (neutral 0):  actual = target·strength
//! ```
//!
//! Which of the two a parameter is gets declared by its field type in the
//! step record, not inferred at run time. Thresholds, knees and window
//! bounds are plain `f64` and never interpolated.

mod hue;
mod saturation;
mod tone;

pub use hue::{HueDesaturate, SkinCorrection, SkinHighlight, SkinRolloff};
pub use saturation::{GlobalHighlightDesaturate, ShadowSaturationBoost};
pub use tone::{BlackCrush, ChannelRebalance, Exposure, HighlightProtect};

use crate::color::Rgb;
use crate::error::{LutError, Result};
use crate::pipeline::PipelineState;
use crate::pipeline::descriptor::{Params, StepDescriptor};
use crate::targeting::{hue_window_strength, linear_window_strength};

/// A parameter whose neutral value is 1.0 (gains, gammas).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factor(pub f64);

impl Factor {
    pub fn at(self, strength: f64) -> f64 {
        1.0 + (self.0 - 1.0) * strength
    }
}

/// A parameter whose neutral value is 0.0 (lifts, shifts, amounts).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(pub f64);

impl Amount {
    pub fn at(self, strength: f64) -> f64 {
        self.0 * strength
    }
}

/// Circular hue window read from `hue_center`, `hue_width` (half width) and
/// `hue_softness`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueWindow {
    pub center: f64,
    pub half_width: f64,
    pub softness: f64,
}

impl HueWindow {
    const DEFAULT_SOFTNESS: f64 = 10.0;

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        let window = Self {
            center: params.number("hue_center")?,
            half_width: params.number("hue_width")?,
            softness: params.number_or("hue_softness", Self::DEFAULT_SOFTNESS)?,
        };
        params.ensure(window.half_width >= 0.0, "hue_width", "must not be negative")?;
        Ok(window)
    }

    pub fn strength(&self, hue: f64) -> f64 {
        hue_window_strength(hue, self.center, self.half_width, self.softness)
    }
}

/// Linear window over a luminance or saturation range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearWindow {
    pub low: f64,
    pub high: f64,
    pub softness: f64,
}

/// Parameter names and defaults for one [`LinearWindow`]. A `None` default
/// makes the bound required.
struct WindowSpec {
    low: (&'static str, Option<f64>),
    high: (&'static str, Option<f64>),
    softness: (&'static str, f64),
}

impl LinearWindow {
    fn parse(params: &mut Params<'_>, spec: WindowSpec) -> Result<Self> {
        let window = Self {
            low: window_bound(params, spec.low)?,
            high: window_bound(params, spec.high)?,
            softness: params.number_or(spec.softness.0, spec.softness.1)?,
        };
        params.ensure(window.low <= window.high, spec.high.0, "upper bound is below lower bound")?;
        Ok(window)
    }

    pub fn strength(&self, value: f64) -> f64 {
        linear_window_strength(value, self.low, self.high, self.softness)
    }
}

fn window_bound(params: &mut Params<'_>, (name, default): (&'static str, Option<f64>)) -> Result<f64> {
    match default {
        Some(default) => params.number_or(name, default),
        None => params.number(name),
    }
}

/// Behavior shared by every step type.
pub(crate) trait Adjustment: Sized {
    /// Identifier used in step descriptors.
    const NAME: &'static str;

    /// Build the typed record from descriptor parameters.
    fn parse(params: &mut Params<'_>) -> Result<Self>;

    /// Apply the step to one pixel.
    fn apply(&self, rgb: Rgb, state: PipelineState, strength: f64) -> (Rgb, PipelineState);
}

/// Return the incoming color untouched when a step left the state as it was,
/// otherwise re-derive RGB from the updated state.
fn settle(rgb: Rgb, before: PipelineState, after: PipelineState) -> (Rgb, PipelineState) {
    if after == before {
        (rgb, before)
    } else {
        (after.to_rgb(), after)
    }
}

fn parse_with<T: Adjustment>(descriptor: &StepDescriptor) -> Result<T> {
    let mut params = Params::new(T::NAME, &descriptor.params);
    let step = T::parse(&mut params)?;
    params.finish();
    Ok(step)
}

/// A fully parsed pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    ChannelRebalance(ChannelRebalance),
    Exposure(Exposure),
    HighlightProtect(HighlightProtect),
    BlackCrush(BlackCrush),
    HueDesaturate(HueDesaturate),
    SkinCorrection(SkinCorrection),
    ShadowSaturationBoost(ShadowSaturationBoost),
    SkinHighlight(SkinHighlight),
    SkinRolloff(SkinRolloff),
    GlobalHighlightDesaturate(GlobalHighlightDesaturate),
}

impl Step {
    /// Every recognized step identifier.
    pub const KINDS: [&'static str; 10] = [
        ChannelRebalance::NAME,
        Exposure::NAME,
        HighlightProtect::NAME,
        BlackCrush::NAME,
        HueDesaturate::NAME,
        SkinCorrection::NAME,
        ShadowSaturationBoost::NAME,
        SkinHighlight::NAME,
        SkinRolloff::NAME,
        GlobalHighlightDesaturate::NAME,
    ];

    /// Parse a descriptor. Unknown identifiers and missing required
    /// parameters are errors; nothing is skipped.
    pub fn from_descriptor(descriptor: &StepDescriptor) -> Result<Self> {
        let step = match descriptor.kind.as_str() {
            "channel_rebalance" => Self::ChannelRebalance(parse_with(descriptor)?),
            "exposure" => Self::Exposure(parse_with(descriptor)?),
            "highlight_protect" => Self::HighlightProtect(parse_with(descriptor)?),
            "black_crush" => Self::BlackCrush(parse_with(descriptor)?),
            "hue_desaturate" => Self::HueDesaturate(parse_with(descriptor)?),
            "skin_correction" => Self::SkinCorrection(parse_with(descriptor)?),
            "shadow_saturation_boost" => Self::ShadowSaturationBoost(parse_with(descriptor)?),
            "skin_highlight" => Self::SkinHighlight(parse_with(descriptor)?),
            "skin_rolloff" => Self::SkinRolloff(parse_with(descriptor)?),
            "global_highlight_desaturate" => {
                Self::GlobalHighlightDesaturate(parse_with(descriptor)?)
            }
            other => {
                return Err(LutError::UnknownStep {
                    kind: other.to_string(),
                });
            }
        };
        Ok(step)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ChannelRebalance(_) => ChannelRebalance::NAME,
            Self::Exposure(_) => Exposure::NAME,
            Self::HighlightProtect(_) => HighlightProtect::NAME,
            Self::BlackCrush(_) => BlackCrush::NAME,
            Self::HueDesaturate(_) => HueDesaturate::NAME,
            Self::SkinCorrection(_) => SkinCorrection::NAME,
            Self::ShadowSaturationBoost(_) => ShadowSaturationBoost::NAME,
            Self::SkinHighlight(_) => SkinHighlight::NAME,
            Self::SkinRolloff(_) => SkinRolloff::NAME,
            Self::GlobalHighlightDesaturate(_) => GlobalHighlightDesaturate::NAME,
        }
    }

    pub fn apply(&self, rgb: Rgb, state: PipelineState, strength: f64) -> (Rgb, PipelineState) {
        match self {
            Self::ChannelRebalance(step) => step.apply(rgb, state, strength),
            Self::Exposure(step) => step.apply(rgb, state, strength),
            Self::HighlightProtect(step) => step.apply(rgb, state, strength),
            Self::BlackCrush(step) => step.apply(rgb, state, strength),
            Self::HueDesaturate(step) => step.apply(rgb, state, strength),
            Self::SkinCorrection(step) => step.apply(rgb, state, strength),
            Self::ShadowSaturationBoost(step) => step.apply(rgb, state, strength),
            Self::SkinHighlight(step) => step.apply(rgb, state, strength),
            Self::SkinRolloff(step) => step.apply(rgb, state, strength),
            Self::GlobalHighlightDesaturate(step) => step.apply(rgb, state, strength),
        }
    }
}
