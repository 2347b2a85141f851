//! Mapping an evaluation onto LED visual state.

use crate::circuit::{Part, PartKind};

use super::FULL_BRIGHTNESS_STRENGTH;

/// LED brightness for a total source strength, scaled so that
/// `full_scale` and above give 1. Clamped to [0, 1]; non-finite input
/// gives 0.
pub fn brightness_for(total_source_strength: f64, full_scale: f64) -> f64 {
    let level = total_source_strength / full_scale;
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

/// Brightness with the standard full scale.
pub fn brightness(total_source_strength: f64) -> f64 {
    brightness_for(total_source_strength, FULL_BRIGHTNESS_STRENGTH)
}

/// New part list with every LED lit (or dimmed) by the global outcome.
///
/// Parts of other kinds are returned unchanged.
pub fn apply_result(parts: &[Part], complete: bool, total_source_strength: f64) -> Vec<Part> {
    apply_lighting(parts, |_| complete, brightness(total_source_strength))
}

/// New part list where each LED for which `lit` holds glows at `level`
/// and every other LED is switched off.
pub fn apply_lighting(parts: &[Part], lit: impl Fn(&Part) -> bool, level: f64) -> Vec<Part> {
    parts
        .iter()
        .map(|part| {
            let mut part = part.clone();
            if part.kind == PartKind::Led {
                let on = lit(&part);
                part.glow = on;
                part.brightness = if on { level } else { 0.0 };
            }
            part
        })
        .collect()
}
