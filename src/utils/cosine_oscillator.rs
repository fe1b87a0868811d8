//! Cosine oscillator.
//!
//! Generates `0.5 + 0.5 * cos(2 * pi * frequency * n)` for `n = 0, 1, 2, ...`
//! with one multiply-add per step. Used to spread strike energy across a
//! mode bank.

// Based on MIT-licensed code (c) 2014 by Olivier Gillet (ol.gillet@gmail.com)

#[allow(unused_imports)]
use num_traits::float::Float;

#[derive(Debug, Default, Clone)]
pub struct CosineOscillator {
    y1: f32,
    y0: f32,
    iir_coefficient: f32,
    initial_amplitude: f32,
}

impl CosineOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `frequency` is normalized to the step rate (cycles per step).
    pub fn init(&mut self, frequency: f32) {
        self.iir_coefficient = 2.0 * (2.0 * core::f32::consts::PI * frequency).cos();
        self.initial_amplitude = self.iir_coefficient * 0.25;

        self.start();
    }

    #[inline]
    pub fn start(&mut self) {
        self.y1 = self.initial_amplitude;
        self.y0 = 0.5;
    }

    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f32 {
        let temp = self.y0;
        self.y0 = self.iir_coefficient * self.y0 - self.y1;
        self.y1 = temp;

        temp + 0.5
    }
}
