//! Utility functions shared by the resonators, voices and instruments.

pub mod cosine_oscillator;
pub mod parameter_interpolator;
pub mod units;

#[inline]
pub fn soft_limit(x: f32) -> f32 {
    x * (27.0 + x * x) / (27.0 + 9.0 * x * x)
}

#[inline]
pub fn soft_clip(x: f32) -> f32 {
    if x < -3.0 {
        -1.0
    } else if x > 3.0 {
        1.0
    } else {
        soft_limit(x)
    }
}

/// Clamps `x` to `min..=max`, mapping non-finite values to `fallback`.
#[inline]
pub fn clamp_finite(x: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if x.is_finite() {
        x.clamp(min, max)
    } else {
        fallback
    }
}
