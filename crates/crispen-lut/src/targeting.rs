//! Targeting functions: how strongly a pixel qualifies for a step.
//!
//! Hue windows feather with a raised cosine. Luminance and saturation
//! windows use a plain linear ramp.
//!
//! ```text
//!  hue window:        1 ─────╮           linear window:   1   ╱‾‾‾‾‾‾╲
//!                            ╰──╮                            ╱        ╲
//!                  0            ╰─────                 0 ──╯          ╰──
//!                     hw−soft  hw+soft                     low          high
//! ```

use std::f64::consts::PI;

/// Strength of a circular hue window centered on `center` (degrees).
///
/// Distance is measured around the hue circle. Inside `half_width - softness`
/// the window is fully on, beyond `half_width + softness` fully off, and in
/// between it follows `(1 + cos(t·π)) / 2` where
/// `t = (d − (half_width − softness)) / (2·softness)`.
///
/// A non-positive `softness` gives a hard edge at `half_width`.
pub fn hue_window_strength(hue: f64, center: f64, half_width: f64, softness: f64) -> f64 {
    let raw = (hue - center).abs() % 360.0;
    let distance = raw.min(360.0 - raw);

    if softness <= 0.0 {
        return if distance <= half_width { 1.0 } else { 0.0 };
    }

    let inner = half_width - softness;
    if distance <= inner {
        1.0
    } else if distance > half_width + softness {
        0.0
    } else {
        let t = (distance - inner) / (2.0 * softness);
        (1.0 + (t * PI).cos()) * 0.5
    }
}

/// Strength of a linear (non-circular) window over `[low, high]`.
///
/// Zero outside the range, ramping linearly up over `[low, low + softness]`
/// and down over `[high − softness, high]`. Used for both luminance and
/// saturation gating.
pub fn linear_window_strength(value: f64, low: f64, high: f64, softness: f64) -> f64 {
    if value < low || value > high {
        return 0.0;
    }
    if softness <= 0.0 {
        return 1.0;
    }

    let rise = (value - low) / softness;
    let fall = (high - value) / softness;
    rise.min(fall).min(1.0)
}

/// Quadratic highlight rolloff.
///
/// Identity up to `knee_start`; above it
/// `knee_start + (ceiling − knee_start)·(2t − t²)` with
/// `t = (value − knee_start) / (1 − knee_start)`, capped at `t = 1`.
/// The result never exceeds `ceiling` and is monotonic non-decreasing.
pub fn soft_knee_rolloff(value: f64, knee_start: f64, ceiling: f64) -> f64 {
    if value <= knee_start {
        return value;
    }
    if knee_start >= 1.0 {
        return value.min(ceiling);
    }

    let t = ((value - knee_start) / (1.0 - knee_start)).min(1.0);
    knee_start + (ceiling - knee_start) * (2.0 * t - t * t)
}

/// Hermite smoothstep `3t² − 2t³` on `t` clamped to [0, 1].
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
