//! A single damped resonant mode.
//!
//! The mode is a Chamberlin state-variable filter: `state_1` is the band-pass
//! (resonant) branch, `state_2` the integrator feeding it back. Both states are
//! scaled by a per-sample decay multiplier, and the mode keeps a running energy
//! estimate that the voices use to decide when they have fallen silent.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::utils::clamp_finite;

/// Upper bound for the frequency coefficient.
pub const MAX_G: f32 = 1.0;

/// Resonance (inverse quality) range.
pub const MIN_RESONANCE: f32 = 0.0;
pub const MAX_RESONANCE: f32 = 2.0;

// g * (g + 2r) must stay below 4 for the recursion's poles to stay inside the
// unit circle.
const STABILITY_LIMIT: f32 = 3.9;

// How fast the stored energy follows the instantaneous state energy.
const ENERGY_TRACKING: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct ResonantMode {
    sample_rate: f32,

    frequency: f32,
    quality: f32,
    amplitude: f32,
    decay: f32,

    g: f32,
    resonance: f32,

    state_1: f32,
    state_2: f32,
    energy: f32,
}

impl Default for ResonantMode {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            frequency: 100.0,
            quality: 10.0,
            amplitude: 1.0,
            decay: 1.0,
            g: 0.0,
            resonance: 0.1,
            state_1: 0.0,
            state_2: 0.0,
            energy: 0.0,
        }
    }
}

impl ResonantMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.calculate_coefficients();
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn set_quality(&mut self, quality: f32) {
        self.quality = quality;
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = clamp_finite(amplitude, 0.0, f32::MAX, 0.0);
    }

    /// Per-sample state multiplier, clamped to `0.0..=1.0`.
    pub fn set_decay(&mut self, decay: f32) {
        self.decay = clamp_finite(decay, 0.0, 1.0, 0.0);
    }

    /// Must be called after changing frequency or quality.
    pub fn calculate_coefficients(&mut self) {
        self.resonance = if self.quality.is_finite() && self.quality > 0.0 {
            (1.0 / self.quality).clamp(MIN_RESONANCE, MAX_RESONANCE)
        } else {
            MAX_RESONANCE
        };

        let frequency = clamp_finite(self.frequency, 0.0, self.sample_rate * 0.5, 0.0);
        let g = 2.0 * core::f32::consts::PI * frequency / self.sample_rate;

        let r = self.resonance;
        let g_limit = (-r + (r * r + STABILITY_LIMIT).sqrt()).min(MAX_G);
        self.g = clamp_finite(g, 0.0, g_limit, 0.0);
    }

    /// Adds `amount` to the resonant branch, as a hammer would add velocity.
    #[inline]
    pub fn excite(&mut self, amount: f32) {
        self.state_1 += amount;
        self.energy = self.energy.max(self.instantaneous_energy());
    }

    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        self.state_2 += self.g * self.state_1;
        let hp = input - self.state_2 - self.resonance * self.state_1;
        self.state_1 += self.g * hp;

        self.state_1 *= self.decay;
        self.state_2 *= self.decay;

        // Undriven, the estimate may only fall.
        let instantaneous = self.instantaneous_energy();
        let tracked = if input == 0.0 {
            instantaneous.min(self.energy)
        } else {
            instantaneous
        };
        self.energy = self.decay * (self.energy + ENERGY_TRACKING * (tracked - self.energy));

        self.state_1 * self.amplitude
    }

    pub fn reset(&mut self) {
        self.state_1 = 0.0;
        self.state_2 = 0.0;
        self.energy = 0.0;
    }

    #[inline]
    fn instantaneous_energy(&self) -> f32 {
        0.5 * self.amplitude * self.amplitude
            * (self.state_1 * self.state_1 + self.state_2 * self.state_2)
    }

    #[inline]
    pub fn energy(&self) -> f32 {
        self.energy
    }

    #[inline]
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    #[inline]
    pub fn g(&self) -> f32 {
        self.g
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    #[inline]
    pub fn decay(&self) -> f32 {
        self.decay
    }
}
