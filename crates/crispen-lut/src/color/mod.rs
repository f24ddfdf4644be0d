//! Color representations and the RGB ↔ HSL converter.

pub mod hsl;

pub use hsl::{Hsl, hsl_to_rgb, rgb_to_hsl, wrap_hue};

/// An RGB triple. Nominally in [0, 1], but intermediate pipeline values may
/// leave that range; only the table builder clamps.
pub type Rgb = [f64; 3];
