//! Hue-windowed steps: selective desaturation, skin isolation and skin highlights.

use super::{Adjustment, Amount, HueWindow, LinearWindow, WindowSpec, settle};
use crate::color::Rgb;
use crate::error::Result;
use crate::pipeline::PipelineState;
use crate::pipeline::descriptor::Params;
use crate::targeting::soft_knee_rolloff;

/// How far `l` sits above `knee`, normalized to [0, 1].
fn excess_over(l: f64, knee: f64) -> f64 {
    if knee >= 1.0 {
        return if l > knee { 1.0 } else { 0.0 };
    }
    ((l - knee) / (1.0 - knee)).clamp(0.0, 1.0)
}

/// Reduce saturation (and optionally rotate hue) inside a hue window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueDesaturate {
    pub hue: HueWindow,
    pub desaturate: Amount,
    pub hue_shift: Amount,
    pub min_saturation: f64,
    /// Weight the window by the pixel's own saturation, so that already
    /// muted colors are touched less.
    pub scale_by_saturation: bool,
}

impl Adjustment for HueDesaturate {
    const NAME: &'static str = "hue_desaturate";

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        Ok(Self {
            hue: HueWindow::parse(params)?,
            desaturate: Amount(params.number("desaturate")?),
            hue_shift: Amount(params.number_or("hue_shift", 0.0)?),
            min_saturation: params.number_or("min_saturation", 0.0)?,
            scale_by_saturation: params.flag_or("scale_by_saturation", false)?,
        })
    }

    fn apply(&self, rgb: Rgb, state: PipelineState, strength: f64) -> (Rgb, PipelineState) {
        if state.s < self.min_saturation {
            return (rgb, state);
        }

        let mut weight = self.hue.strength(state.h);
        if self.scale_by_saturation {
            weight *= state.s.clamp(0.0, 1.0);
        }
        if weight <= 0.0 {
            return (rgb, state);
        }

        let next = state
            .with_saturation(state.s * (1.0 - self.desaturate.at(strength) * weight))
            .with_hue(state.h + self.hue_shift.at(strength) * weight);
        settle(rgb, state, next)
    }
}

/// Surgical skin-tone hue shift gated by hue, saturation and original
/// luminance windows, with optional adaptive desaturation of oversaturated
/// skin.
///
/// The luminance window reads `orig_l`, so an earlier exposure step cannot
/// push a face into or out of the correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinCorrection {
    pub hue: HueWindow,
    pub saturation: LinearWindow,
    pub luminance: LinearWindow,
    pub hue_shift: Amount,
    pub adaptive_desaturate: Amount,
    /// Saturation above which adaptive desaturation starts.
    pub sat_reference: f64,
}

impl Adjustment for SkinCorrection {
    const NAME: &'static str = "skin_correction";

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        let hue = HueWindow::parse(params)?;
        let saturation = LinearWindow::parse(
            params,
            WindowSpec {
                low: ("sat_low", Some(0.0)),
                high: ("sat_high", Some(1.0)),
                softness: ("sat_softness", 0.05),
            },
        )?;
        let luminance = LinearWindow::parse(
            params,
            WindowSpec {
                low: ("lum_low", Some(0.0)),
                high: ("lum_high", Some(1.0)),
                softness: ("lum_softness", 0.05),
            },
        )?;
        Ok(Self {
            hue,
            saturation,
            luminance,
            hue_shift: Amount(params.number("hue_shift")?),
            adaptive_desaturate: Amount(params.number_or("adaptive_desaturate", 0.0)?),
            sat_reference: params.number_or("sat_reference", 0.4)?,
        })
    }

    fn apply(&self, rgb: Rgb, state: PipelineState, strength: f64) -> (Rgb, PipelineState) {
        let weight = self.hue.strength(state.h)
            * self.saturation.strength(state.s)
            * self.luminance.strength(state.orig_l);
        if weight <= 0.0 {
            return (rgb, state);
        }

        let mut next = state.with_hue(state.h + self.hue_shift.at(strength) * weight);

        let desaturate = self.adaptive_desaturate.at(strength);
        if desaturate != 0.0 && state.s > self.sat_reference && self.sat_reference < 1.0 {
            let excess = (state.s - self.sat_reference) / (1.0 - self.sat_reference);
            // Clamped so extreme settings cannot invert saturation.
            let ratio = (desaturate * weight * excess).clamp(0.0, 1.0);
            next = next.with_saturation(state.s * (1.0 - ratio));
        }

        settle(rgb, state, next)
    }
}

/// Highlight handling split by hue: skin pixels get a hue-weighted rolloff
/// plus desaturation above `skin_knee`; everything outside the skin window
/// gets a gentler global rolloff above `global_knee`.
///
/// The two branches are mutually exclusive. At the outer edge of the hue
/// window the output steps from a nearly faded skin rolloff to the full
/// global rolloff; a `global_knee` near 1 keeps that step small.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinHighlight {
    pub hue: HueWindow,
    pub skin_knee: f64,
    pub skin_ceiling: f64,
    pub skin_desaturate: Amount,
    pub global_knee: f64,
    pub global_ceiling: f64,
    pub amount: Amount,
}

impl Adjustment for SkinHighlight {
    const NAME: &'static str = "skin_highlight";

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        Ok(Self {
            hue: HueWindow::parse(params)?,
            skin_knee: params.number("skin_knee")?,
            skin_ceiling: params.number_or("skin_ceiling", 1.0)?,
            skin_desaturate: Amount(params.number_or("skin_desaturate", 0.0)?),
            global_knee: params.number("global_knee")?,
            global_ceiling: params.number_or("global_ceiling", 1.0)?,
            amount: Amount(params.number_or("amount", 1.0)?),
        })
    }

    fn apply(&self, rgb: Rgb, state: PipelineState, strength: f64) -> (Rgb, PipelineState) {
        let l = state.l;
        let amount = self.amount.at(strength);
        let weight = self.hue.strength(state.h);

        let next = if weight > 0.0 {
            if l <= self.skin_knee {
                return (rgb, state);
            }
            let target = soft_knee_rolloff(l, self.skin_knee, self.skin_ceiling);
            let desaturate = self.skin_desaturate.at(strength) * weight * excess_over(l, self.skin_knee);
            state
                .with_luminance(l + (target - l) * amount * weight)
                .with_saturation(state.s * (1.0 - desaturate))
        } else {
            if l <= self.global_knee {
                return (rgb, state);
            }
            let target = soft_knee_rolloff(l, self.global_knee, self.global_ceiling);
            state.with_luminance(l + (target - l) * amount)
        };

        settle(rgb, state, next)
    }
}

/// Proportional blend toward a knee-compressed luminance for skin hues only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinRolloff {
    pub hue: HueWindow,
    pub min_saturation: f64,
    pub knee: f64,
    pub ceiling: f64,
    pub amount: Amount,
}

impl Adjustment for SkinRolloff {
    const NAME: &'static str = "skin_rolloff";

    fn parse(params: &mut Params<'_>) -> Result<Self> {
        Ok(Self {
            hue: HueWindow::parse(params)?,
            min_saturation: params.number_or("min_saturation", 0.0)?,
            knee: params.number("knee")?,
            ceiling: params.number_or("ceiling", 1.0)?,
            amount: Amount(params.number_or("amount", 1.0)?),
        })
    }

    fn apply(&self, rgb: Rgb, state: PipelineState, strength: f64) -> (Rgb, PipelineState) {
        if state.s < self.min_saturation || state.l <= self.knee {
            return (rgb, state);
        }
        let weight = self.hue.strength(state.h);
        if weight <= 0.0 {
            return (rgb, state);
        }

        let l = state.l;
        let target = soft_knee_rolloff(l, self.knee, self.ceiling);
        let next = state.with_luminance(l + (target - l) * self.amount.at(strength) * weight);
        settle(rgb, state, next)
    }
}
