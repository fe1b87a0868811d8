//! Struck membrane modelled as a bank of resonant modes.
//!
//! Mode `k` sits on harmonic `n = k + 1` of the fundamental, pushed upwards by
//! a stiffness term (`n * sqrt(1 + B * n^2)`) and pulled down slightly by the
//! membrane diameter. A strike distributes energy over the modes according to
//! the strike position: even-indexed modes are treated as axisymmetric (loudest
//! for a central hit), odd-indexed modes as asymmetric (silent at the center,
//! growing towards the rim).

#[allow(unused_imports)]
use num_traits::float::Float;

use super::resonant_mode::ResonantMode;
use crate::utils::clamp_finite;
use crate::utils::cosine_oscillator::CosineOscillator;
use crate::utils::units::t60_to_decay;

pub const MAX_NUM_MODES: usize = 16;

pub const DEFAULT_FUNDAMENTAL_FREQUENCY: f32 = 60.0;
pub const DEFAULT_DIAMETER_METERS: f32 = 1.0;
pub const DEFAULT_INHARMONICITY: f32 = 0.1;
pub const DEFAULT_NUM_MODES: usize = 8;
pub const DEFAULT_DECAY_SECONDS: f32 = 1.5;

pub const MIN_DIAMETER_METERS: f32 = 0.05;
pub const MAX_DIAMETER_METERS: f32 = 20.0;

// Stiffness coefficient B at inharmonicity 1.0.
const MAX_STIFFNESS: f32 = 0.01;
const DIAMETER_DETUNE_EXPONENT: f32 = -0.125;
// Modes above this fraction of the sample rate are muted.
const MAX_MODE_FREQUENCY_RATIO: f32 = 0.15;
const MODE_Q: f32 = 400.0;
const STRIKE_GAIN: f32 = 0.5;
// Extra decay rate per mode index.
const HIGH_MODE_DAMPING: f32 = 0.35;
const MIN_DECAY_SECONDS: f32 = 0.01;
const MAX_DECAY_SECONDS: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Frequency of the first mode before diameter detuning, in Hz.
    pub fundamental_frequency: f32,
    /// Physical diameter; scales strike energy and lowers the mode tuning.
    pub diameter_meters: f32,
    /// Upward detuning of higher modes, `0.0..=1.0`.
    pub inharmonicity: f32,
    /// Number of active modes, `1..=MAX_NUM_MODES`.
    pub num_modes: usize,
    /// Time for the fundamental to fall by 60 dB, applied on the next strike.
    pub decay_seconds: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            fundamental_frequency: DEFAULT_FUNDAMENTAL_FREQUENCY,
            diameter_meters: DEFAULT_DIAMETER_METERS,
            inharmonicity: DEFAULT_INHARMONICITY,
            num_modes: DEFAULT_NUM_MODES,
            decay_seconds: DEFAULT_DECAY_SECONDS,
        }
    }
}

impl Parameters {
    pub fn sanitized(&self) -> Self {
        Self {
            fundamental_frequency: clamp_finite(
                self.fundamental_frequency,
                1.0,
                20000.0,
                DEFAULT_FUNDAMENTAL_FREQUENCY,
            ),
            diameter_meters: clamp_finite(
                self.diameter_meters,
                MIN_DIAMETER_METERS,
                MAX_DIAMETER_METERS,
                DEFAULT_DIAMETER_METERS,
            ),
            inharmonicity: clamp_finite(self.inharmonicity, 0.0, 1.0, DEFAULT_INHARMONICITY),
            num_modes: self.num_modes.clamp(1, MAX_NUM_MODES),
            decay_seconds: clamp_finite(
                self.decay_seconds,
                MIN_DECAY_SECONDS,
                MAX_DECAY_SECONDS,
                DEFAULT_DECAY_SECONDS,
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MembraneResonator {
    sample_rate: f32,
    parameters: Parameters,
    modes: [ResonantMode; MAX_NUM_MODES],
    energy: f32,
}

impl Default for MembraneResonator {
    fn default() -> Self {
        let mut membrane = Self {
            sample_rate: 48000.0,
            parameters: Parameters::default(),
            modes: core::array::from_fn(|_| ResonantMode::new()),
            energy: 0.0,
        };
        membrane.set_parameters(Parameters::default());
        membrane
    }
}

impl MembraneResonator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for mode in self.modes.iter_mut() {
            mode.prepare(sample_rate);
        }
        self.set_parameters(self.parameters);
        self.reset();
    }

    /// Retunes the mode bank. Ringing modes keep their state.
    pub fn set_parameters(&mut self, parameters: Parameters) {
        let parameters = parameters.sanitized();
        self.parameters = parameters;

        let stiffness = parameters.inharmonicity * MAX_STIFFNESS;
        let detune = parameters.diameter_meters.powf(DIAMETER_DETUNE_EXPONENT);
        let max_frequency = MAX_MODE_FREQUENCY_RATIO * self.sample_rate;

        for (k, mode) in self.modes.iter_mut().enumerate() {
            let n = (k + 1) as f32;
            let frequency =
                parameters.fundamental_frequency * n * (1.0 + stiffness * n * n).sqrt() * detune;
            let audible = k < parameters.num_modes && frequency < max_frequency;

            mode.set_frequency(frequency.min(max_frequency));
            mode.set_quality(MODE_Q);
            mode.set_amplitude(if audible { 1.0 / n.sqrt() } else { 0.0 });
            mode.calculate_coefficients();

            if k >= parameters.num_modes {
                mode.reset();
            }
        }
    }

    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// Injects energy into the modes.
    ///
    /// `force` and `velocity` are in `0.0..=1.0`; `position` goes from the
    /// center (`0.0`) to the rim (`1.0`). The per-mode decay is recomputed here
    /// from [`Parameters::decay_seconds`].
    pub fn strike(&mut self, force: f32, velocity: f32, position: f32) {
        let force = clamp_finite(force, 0.0, 1.0, 0.0);
        let velocity = clamp_finite(velocity, 0.0, 1.0, 0.0);
        let position = clamp_finite(position, 0.0, 1.0, 0.0);

        let num_modes = self.parameters.num_modes;
        let scale = STRIKE_GAIN * force * velocity * self.parameters.diameter_meters.sqrt()
            / (num_modes as f32).sqrt();

        let mut shapes = CosineOscillator::new();
        shapes.init(position * 0.5);

        for (k, mode) in self.modes.iter_mut().take(num_modes).enumerate() {
            let c = shapes.next();
            let shape = if k % 2 == 0 { c } else { 1.0 - c };

            let decay_seconds =
                self.parameters.decay_seconds / (1.0 + k as f32 * HIGH_MODE_DAMPING);
            mode.set_decay(t60_to_decay(decay_seconds, self.sample_rate));

            if mode.amplitude() > 0.0 {
                mode.excite(scale * shape);
            }
        }

        self.energy = self.sum_energy();
    }

    #[inline]
    pub fn process_sample(&mut self) -> f32 {
        let mut out = 0.0;
        let mut energy = 0.0;
        for mode in self.modes.iter_mut().take(self.parameters.num_modes) {
            out += mode.process_sample(0.0);
            energy += mode.energy();
        }
        self.energy = energy;

        out
    }

    /// Sum of the mode energies.
    #[inline]
    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn reset(&mut self) {
        for mode in self.modes.iter_mut() {
            mode.reset();
        }
        self.energy = 0.0;
    }

    /// Read access to an individual mode.
    pub fn mode(&self, index: usize) -> Option<&ResonantMode> {
        self.modes.get(index)
    }

    fn sum_energy(&self) -> f32 {
        self.modes
            .iter()
            .take(self.parameters.num_modes)
            .map(ResonantMode::energy)
            .sum()
    }
}
