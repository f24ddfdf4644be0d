//! Hue-independent saturation steps.

use super::{Adjustment, Amount, LinearWindow, WindowSpec, settle};
use crate::color::Rgb;
use crate::error::Result;
use crate::pipeline::PipelineState;
use crate::pipeline::descriptor::Params;

/// Saturation boost for pixels whose *original* luminance falls in a shadow range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSaturationBoost {
    pub luminance: LinearWindow,
    pub boost: Amount,
}

impl Adjustment for ShadowSaturationBoost {
    const NAME: &'static str = "shadow_saturation_boost";

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        let luminance = LinearWindow::parse(
            params,
            WindowSpec {
                low: ("lum_low", Some(0.0)),
                high: ("lum_high", None),
                softness: ("lum_softness", 0.05),
            },
        )?;
        Ok(Self {
            luminance,
            boost: Amount(params.number("boost")?),
        })
    }

    fn apply(&self, rgb: Rgb, state: PipelineState, strength: f64) -> (Rgb, PipelineState) {
        let weight = self.luminance.strength(state.orig_l);
        if weight <= 0.0 {
            return (rgb, state);
        }
        let next = state.with_saturation(state.s * (1.0 + self.boost.at(strength) * weight));
        settle(rgb, state, next)
    }
}

/// Saturation reduction proportional to how far luminance exceeds a threshold.
///
/// ```text
/// over = clamp((l − threshold) / (1 − threshold), 0, 1)
/// s'   = s × (1 − amount × over)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalHighlightDesaturate {
    pub threshold: f64,
    pub amount: Amount,
}

impl Adjustment for GlobalHighlightDesaturate {
    const NAME: &'static str = "global_highlight_desaturate";

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        let threshold = params.number("threshold")?;
        params.ensure(threshold < 1.0, "threshold", "must be below 1")?;
        Ok(Self {
            threshold,
            amount: Amount(params.number("amount")?),
        })
    }

    fn apply(&self, rgb: Rgb, state: PipelineState, strength: f64) -> (Rgb, PipelineState) {
        if state.l <= self.threshold {
            return (rgb, state);
        }
        let over = ((state.l - self.threshold) / (1.0 - self.threshold)).clamp(0.0, 1.0);
        let next = state.with_saturation(state.s * (1.0 - self.amount.at(strength) * over));
        settle(rgb, state, next)
    }
}
