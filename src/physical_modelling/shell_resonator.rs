//! Drum body: a cavity/shell pair continuously driven by the membrane.

use super::coupled_resonator::{CoupledResonator, Parameters};

#[derive(Debug, Default, Clone)]
pub struct ShellResonator {
    resonator: CoupledResonator,
    drive: f32,
}

impl ShellResonator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(&mut self, sample_rate: f32) {
        self.resonator.prepare(sample_rate);
        self.drive = 0.0;
    }

    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.resonator.set_parameters(parameters);
    }

    pub fn parameters(&self) -> Parameters {
        self.resonator.parameters()
    }

    /// Sets the drive used by the following calls to [`Self::process_sample`].
    /// The value is held, not consumed, until it is set again. Voices pass
    /// the membrane's output each sample.
    #[inline]
    pub fn process_membrane_energy(&mut self, energy_level: f32) {
        self.drive = if energy_level.is_finite() {
            energy_level
        } else {
            0.0
        };
    }

    #[inline]
    pub fn process_sample(&mut self) -> f32 {
        self.resonator.process_sample(self.drive)
    }

    #[inline]
    pub fn energy(&self) -> f32 {
        self.resonator.energy()
    }

    pub fn reset(&mut self) {
        self.resonator.reset();
        self.drive = 0.0;
    }
}
