//! Equal-power stereo placement.
//!
//! `pan` runs from -1 (hard left) through 0 (centre) to +1 (hard right).
//! The position is mapped onto a quarter circle so `L² + R² = 1` everywhere
//! and a voice keeps the same loudness as it moves across the field:
//!
//! ```text
//! x = (pan + 1) / 2
//! L = cos(x · π/2)
//! R = sin(x · π/2)
//! ```

use std::f32::consts::FRAC_PI_2;

/// Clamp a requested position into `[-1, 1]`. NaN lands in the centre.
#[inline]
pub fn clamp_pan(pan: f32) -> f32 {
    if pan.is_nan() {
        0.0
    } else {
        pan.clamp(-1.0, 1.0)
    }
}

/// Left and right gains for `pan` (clamped first).
#[inline]
pub fn equal_power(pan: f32) -> (f32, f32) {
    let x = (clamp_pan(pan) + 1.0) * 0.5;
    let angle = x * FRAC_PI_2;
    (angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_positions_are_clamped() {
        assert_eq!(clamp_pan(-3.0), -1.0);
        assert_eq!(clamp_pan(2.5), 1.0);
        assert_eq!(clamp_pan(0.25), 0.25);
        assert_eq!(clamp_pan(f32::NAN), 0.0);
    }

    #[test]
    fn hard_positions_silence_the_other_side() {
        let (l, r) = equal_power(-1.0);
        assert!((l - 1.0).abs() < 1e-6 && r.abs() < 1e-6);

        let (l, r) = equal_power(7.0);
        assert!(l.abs() < 1e-6 && (r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn power_is_constant_across_the_field() {
        for step in -10..=10 {
            let (l, r) = equal_power(step as f32 / 10.0);
            assert!((l * l + r * r - 1.0).abs() < 1e-5);
        }
        let (l, r) = equal_power(0.0);
        assert!((l - r).abs() < 1e-6);
    }
}
