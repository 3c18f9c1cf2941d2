//! Color fine-tuning: brightness, contrast, saturation.
//!
//! The math follows the CSS Filter Effects definitions of `brightness()`,
//! `contrast()` and `saturate()`, so a preview drawn by a browser canvas with
//! [`FineTune::filter_string`] and a render from [`apply_fine_tune`] agree.
//!
//! ## Order
//! 1. Brightness
//! 2. Contrast
//! 3. Saturation
//!
//! Each step clamps to `[0, 1]` before the next one, as chained filter
//! primitives do. The combination is not commutative.

use crate::FineTune;

/// Apply the fine-tune filter chain to RGBA pixel data in place.
///
/// Alpha is left untouched. An all-default `FineTune` is a no-op.
///
/// # Arguments
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `fine_tune` - Percentages to apply
pub fn apply_fine_tune(pixels: &mut [u8], fine_tune: &FineTune) {
    // Early exit if no adjustments
    if fine_tune.is_default() {
        return;
    }

    let brightness = fine_tune.brightness() as f32 / 100.0;
    let contrast = fine_tune.contrast() as f32 / 100.0;
    let matrix = saturate_matrix(fine_tune.saturation() as f32 / 100.0);

    for chunk in pixels.chunks_exact_mut(4) {
        let mut rgb = [
            chunk[0] as f32 / 255.0,
            chunk[1] as f32 / 255.0,
            chunk[2] as f32 / 255.0,
        ];

        rgb = apply_brightness(rgb, brightness);
        rgb = apply_contrast(rgb, contrast);
        rgb = apply_matrix(rgb, matrix);

        for (out, value) in chunk.iter_mut().zip(rgb) {
            *out = to_byte(value);
        }
    }
}

/// Apply brightness.
///
/// Formula: `output = input * amount` (linear transfer, slope = amount)
#[inline]
fn apply_brightness(rgb: [f32; 3], amount: f32) -> [f32; 3] {
    if amount == 1.0 {
        return rgb;
    }
    rgb.map(|c| (c * amount).clamp(0.0, 1.0))
}

/// Apply contrast.
///
/// Formula: `output = (input - 0.5) * amount + 0.5`
#[inline]
fn apply_contrast(rgb: [f32; 3], amount: f32) -> [f32; 3] {
    if amount == 1.0 {
        return rgb;
    }
    rgb.map(|c| ((c - 0.5) * amount + 0.5).clamp(0.0, 1.0))
}

/// Build the `saturate()` color matrix for `amount` (1.0 = unchanged).
fn saturate_matrix(s: f32) -> [[f32; 3]; 3] {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

#[inline]
fn apply_matrix(rgb: [f32; 3], m: [[f32; 3]; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    m.map(|row| (row[0] * r + row[1] * g + row[2] * b).clamp(0.0, 1.0))
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value * 255.0).round() as u8
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: The filter chain is deterministic.
        #[test]
        fn prop_deterministic(
            pixels in prop::collection::vec(any::<u8>(), 4..=64),
            b in 0u16..=200,
            c in 0u16..=200,
            s in 0u16..=200,
        ) {
            let len = pixels.len() / 4 * 4;
            let adj = FineTune::new(b, c, s);

            let mut first = pixels[..len].to_vec();
            let mut second = pixels[..len].to_vec();
            apply_fine_tune(&mut first, &adj);
            apply_fine_tune(&mut second, &adj);

            prop_assert_eq!(first, second);
        }

        /// Property: Alpha channel is never modified.
        #[test]
        fn prop_alpha_preserved(
            rgba in any::<[u8; 4]>(),
            b in 0u16..=200,
            c in 0u16..=200,
            s in 0u16..=200,
        ) {
            let mut px = rgba;
            apply_fine_tune(&mut px, &FineTune::new(b, c, s));
            prop_assert_eq!(px[3], rgba[3]);
        }

        /// Property: Neutral saturation with neutral brightness/contrast is identity.
        #[test]
        fn prop_neutral_is_identity(rgba in any::<[u8; 4]>()) {
            let mut px = rgba;
            apply_fine_tune(&mut px, &FineTune::new(100, 100, 100));
            prop_assert_eq!(px, rgba);
        }
    }
}
