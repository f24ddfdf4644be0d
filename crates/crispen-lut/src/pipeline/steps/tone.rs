//! Luminance and channel-balance steps.

use super::{Adjustment, Amount, Factor, settle};
use crate::color::Rgb;
use crate::error::Result;
use crate::pipeline::PipelineState;
use crate::pipeline::descriptor::Params;
use crate::targeting::{smoothstep, soft_knee_rolloff};

/// Per-channel RGB gain, faded out for dark pixels.
///
/// ```text
/// k    = clamp(min(max(r, g, b) / gain_ramp, 1), 0, 1)
/// out  = in × (1 + (gain − 1) × k)
/// ```
///
/// The only step that recomputes HSL from scratch and resets `orig_l`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRebalance {
    pub gains: [Factor; 3],
    pub gain_ramp: f64,
}

impl ChannelRebalance {
    const DEFAULT_GAIN_RAMP: f64 = 0.1;
}

impl Adjustment for ChannelRebalance {
    const NAME: &'static str = "channel_rebalance";

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        Ok(Self {
            gains: [
                Factor(params.number_or("r_gain", 1.0)?),
                Factor(params.number_or("g_gain", 1.0)?),
                Factor(params.number_or("b_gain", 1.0)?),
            ],
            gain_ramp: params.number_or("gain_ramp", Self::DEFAULT_GAIN_RAMP)?,
        })
    }

    fn apply(&self, rgb: Rgb, _state: PipelineState, strength: f64) -> (Rgb, PipelineState) {
        let max_channel = rgb[0].max(rgb[1]).max(rgb[2]);
        let ramp = if self.gain_ramp > 0.0 {
            (max_channel / self.gain_ramp).min(1.0).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let mut out = rgb;
        for (channel, gain) in out.iter_mut().zip(self.gains) {
            *channel *= 1.0 + (gain.at(strength) - 1.0) * ramp;
        }
        (out, PipelineState::from_rgb(out))
    }
}

/// Luminance gamma with an optional shadow-floor lift:
/// `l' = (l + lift × (1 − l))^gamma`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exposure {
    pub gamma: Factor,
    pub shadow_lift: Amount,
}

impl Adjustment for Exposure {
    const NAME: &'static str = "exposure";

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        let gamma = params.number("gamma")?;
        params.ensure(gamma > 0.0, "gamma", "must be positive")?;
        Ok(Self {
            gamma: Factor(gamma),
            shadow_lift: Amount(params.number_or("shadow_lift", 0.0)?),
        })
    }

    fn apply(&self, rgb: Rgb, state: PipelineState, strength: f64) -> (Rgb, PipelineState) {
        let lift = self.shadow_lift.at(strength);
        let lifted = state.l + lift * (1.0 - state.l);
        // Negative bases would turn a fractional power into NaN.
        let l = if lifted > 0.0 {
            lifted.powf(self.gamma.at(strength))
        } else {
            lifted
        };
        settle(rgb, state, state.with_luminance(l))
    }
}

/// Soft-knee highlight protection on luminance.
///
/// A fixed safety clamp: it ignores strength, so a pipeline containing it
/// is not an exact identity at strength 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightProtect {
    pub knee: f64,
    pub ceiling: f64,
}

impl Adjustment for HighlightProtect {
    const NAME: &'static str = "highlight_protect";

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        Ok(Self {
            knee: params.number("knee")?,
            ceiling: params.number_or("ceiling", 1.0)?,
        })
    }

    fn apply(&self, rgb: Rgb, state: PipelineState, _strength: f64) -> (Rgb, PipelineState) {
        if state.l <= self.knee {
            return (rgb, state);
        }
        let l = soft_knee_rolloff(state.l, self.knee, self.ceiling);
        settle(rgb, state, state.with_luminance(l))
    }
}

/// Steepened shadow gamma, blended back to identity by `transition_end`.
///
/// ```text
/// crushed(l) = te × (l / te)^γ
///
/// l < threshold          →  crushed(l)
/// threshold ≤ l < te     →  lerp(crushed(l), l, smoothstep((l − threshold) / (te − threshold)))
/// l ≥ te                 →  l
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackCrush {
    pub threshold: f64,
    pub crush_gamma: Factor,
    pub transition_end: f64,
}

impl Adjustment for BlackCrush {
    const NAME: &'static str = "black_crush";

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        let threshold = params.number("threshold")?;
        let crush_gamma = params.number("crush_gamma")?;
        let transition_end = params.number("transition_end")?;
        params.ensure(threshold >= 0.0, "threshold", "must not be negative")?;
        params.ensure(crush_gamma > 0.0, "crush_gamma", "must be positive")?;
        params.ensure(
            transition_end > 0.0 && transition_end >= threshold,
            "transition_end",
            "must be positive and not below threshold",
        )?;
        Ok(Self {
            threshold,
            crush_gamma: Factor(crush_gamma),
            transition_end,
        })
    }

    fn apply(&self, rgb: Rgb, state: PipelineState, strength: f64) -> (Rgb, PipelineState) {
        let l = state.l;
        let te = self.transition_end;
        if l >= te || l <= 0.0 {
            return (rgb, state);
        }

        let crushed = te * (l / te).powf(self.crush_gamma.at(strength));
        let out = if l < self.threshold {
            crushed
        } else {
            let t = (l - self.threshold) / (te - self.threshold);
            crushed + (l - crushed) * smoothstep(t)
        };
        settle(rgb, state, state.with_luminance(out))
    }
}
