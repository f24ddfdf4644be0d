//! Per-pixel state threaded through a pipeline run.

use crate::color::{Hsl, Rgb, hsl_to_rgb, rgb_to_hsl, wrap_hue};

/// Running HSL values for one pixel plus the luminance it entered with.
///
/// `orig_l` is fixed at pipeline entry and only reset by channel
/// rebalancing, which legitimately changes a color's physical brightness.
/// Luminance curves (exposure, highlight protection, black crush) leave it
/// alone so that later window tests see where the pixel started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineState {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub orig_l: f64,
}

impl PipelineState {
    /// Fresh state for a color, with `orig_l` equal to its luminance.
    pub fn from_rgb(rgb: Rgb) -> Self {
        let Hsl { h, s, l } = rgb_to_hsl(rgb);
        Self { h, s, l, orig_l: l }
    }

    pub fn with_hue(self, h: f64) -> Self {
        Self {
            h: wrap_hue(h),
            ..self
        }
    }

    pub fn with_saturation(self, s: f64) -> Self {
        Self { s, ..self }
    }

    pub fn with_luminance(self, l: f64) -> Self {
        Self { l, ..self }
    }

    pub fn hsl(&self) -> Hsl {
        Hsl {
            h: self.h,
            s: self.s,
            l: self.l,
        }
    }

    pub fn to_rgb(&self) -> Rgb {
        hsl_to_rgb(self.hsl())
    }
}
