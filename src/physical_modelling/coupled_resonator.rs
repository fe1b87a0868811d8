//! Two resonant modes (an air cavity and a solid shell) exchanging energy.
//!
//! Each side is driven by the common input plus a share of the other side's
//! output from the previous sample. Reading only the previous sample keeps the
//! update acyclic, so the result does not depend on which side runs first.

use super::resonant_mode::ResonantMode;
use crate::utils::clamp_finite;

pub const DEFAULT_CAVITY_FREQUENCY: f32 = 120.0;
pub const DEFAULT_SHELL_FORMANT: f32 = 300.0;
pub const DEFAULT_CAVITY_Q: f32 = 8.0;
pub const DEFAULT_SHELL_Q: f32 = 12.0;
pub const DEFAULT_COUPLING: f32 = 0.5;

pub const MIN_Q: f32 = 0.5;
pub const MAX_Q: f32 = 200.0;

const MIN_FREQUENCY: f32 = 10.0;
const MAX_FREQUENCY: f32 = 20000.0;

// Coefficient slopes over coupling. The product of the two cross-feed slopes
// is the worst-case loop gain and must stay well below one.
const CAVITY_TO_SHELL_SLOPE: f32 = 0.45;
const SHELL_TO_CAVITY_SLOPE: f32 = 0.3;
const SHELL_MIX_SLOPE: f32 = 0.6;
const CAVITY_MIX_SLOPE: f32 = 0.4;

// Slight extra loss on both modes on top of their Q.
const MODE_DECAY: f32 = 0.9998;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Air cavity resonance in Hz.
    pub cavity_frequency: f32,
    /// Shell resonance in Hz.
    pub shell_formant: f32,
    /// Cavity quality factor, `0.5..=200.0`.
    pub cavity_q: f32,
    /// Shell quality factor, `0.5..=200.0`.
    pub shell_q: f32,
    /// Coupling amount, `0.0..=1.0`.
    pub coupling: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            cavity_frequency: DEFAULT_CAVITY_FREQUENCY,
            shell_formant: DEFAULT_SHELL_FORMANT,
            cavity_q: DEFAULT_CAVITY_Q,
            shell_q: DEFAULT_SHELL_Q,
            coupling: DEFAULT_COUPLING,
        }
    }
}

impl Parameters {
    /// Returns a copy with every field inside its valid range.
    pub fn sanitized(&self) -> Self {
        Self {
            cavity_frequency: clamp_finite(
                self.cavity_frequency,
                MIN_FREQUENCY,
                MAX_FREQUENCY,
                DEFAULT_CAVITY_FREQUENCY,
            ),
            shell_formant: clamp_finite(
                self.shell_formant,
                MIN_FREQUENCY,
                MAX_FREQUENCY,
                DEFAULT_SHELL_FORMANT,
            ),
            cavity_q: clamp_finite(self.cavity_q, MIN_Q, MAX_Q, DEFAULT_CAVITY_Q),
            shell_q: clamp_finite(self.shell_q, MIN_Q, MAX_Q, DEFAULT_SHELL_Q),
            coupling: clamp_finite(self.coupling, 0.0, 1.0, DEFAULT_COUPLING),
        }
    }
}

/// Values derived from [`Parameters::coupling`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CouplingCoefficients {
    pub cavity_to_shell: f32,
    pub shell_to_cavity: f32,
    pub shell_mix: f32,
    pub cavity_mix: f32,
}

impl CouplingCoefficients {
    pub fn from_coupling(coupling: f32) -> Self {
        let c = clamp_finite(coupling, 0.0, 1.0, 0.0);
        Self {
            cavity_to_shell: CAVITY_TO_SHELL_SLOPE * c,
            shell_to_cavity: SHELL_TO_CAVITY_SLOPE * c,
            shell_mix: SHELL_MIX_SLOPE * c,
            cavity_mix: CAVITY_MIX_SLOPE * c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoupledResonator {
    parameters: Parameters,
    coefficients: CouplingCoefficients,

    cavity: ResonantMode,
    shell: ResonantMode,

    previous_cavity: f32,
    previous_shell: f32,
}

impl Default for CoupledResonator {
    fn default() -> Self {
        let mut resonator = Self {
            parameters: Parameters::default(),
            coefficients: CouplingCoefficients::default(),
            cavity: ResonantMode::new(),
            shell: ResonantMode::new(),
            previous_cavity: 0.0,
            previous_shell: 0.0,
        };
        resonator.set_parameters(Parameters::default());
        resonator
    }
}

impl CoupledResonator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(&mut self, sample_rate: f32) {
        self.cavity.prepare(sample_rate);
        self.shell.prepare(sample_rate);
        self.reset();
    }

    pub fn set_parameters(&mut self, parameters: Parameters) {
        let parameters = parameters.sanitized();
        self.parameters = parameters;
        self.coefficients = CouplingCoefficients::from_coupling(parameters.coupling);

        configure_mode(
            &mut self.cavity,
            parameters.cavity_frequency,
            parameters.cavity_q,
        );
        configure_mode(&mut self.shell, parameters.shell_formant, parameters.shell_q);
    }

    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    pub fn coefficients(&self) -> CouplingCoefficients {
        self.coefficients
    }

    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let cavity_in = input + self.coefficients.shell_to_cavity * self.previous_shell;
        let shell_in = input + self.coefficients.cavity_to_shell * self.previous_cavity;

        let cavity_out = self.cavity.process_sample(cavity_in);
        let shell_out = self.shell.process_sample(shell_in);

        self.previous_cavity = cavity_out;
        self.previous_shell = shell_out;

        self.coefficients.cavity_mix * cavity_out + self.coefficients.shell_mix * shell_out
    }

    #[inline]
    pub fn energy(&self) -> f32 {
        self.cavity.energy() + self.shell.energy()
    }

    pub fn reset(&mut self) {
        self.cavity.reset();
        self.shell.reset();
        self.previous_cavity = 0.0;
        self.previous_shell = 0.0;
    }
}

fn configure_mode(mode: &mut ResonantMode, frequency: f32, q: f32) {
    mode.set_frequency(frequency);
    mode.set_quality(q);
    mode.set_decay(MODE_DECAY);
    mode.calculate_coefficients();
    // Band-pass peak gain is 1/r; scaling by r normalizes it to about one.
    mode.set_amplitude(mode.resonance());
}
