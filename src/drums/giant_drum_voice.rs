//! One playable drum: a struck membrane feeding a coupled cavity/shell body.
//!
//! The voice is Active from [`GiantDrumVoice::trigger`] until the combined
//! membrane and shell energy drops below [`SILENCE_FLOOR`]; it then resets its
//! resonators and returns to Idle on its own. There is no release stage.
//!
//! The body is driven by the membrane's output rather than by its energy
//! envelope. The envelope is nearly DC and would sit far below the cavity and
//! shell resonances.

#[allow(unused_imports)]
use num_traits::float::Float;

use super::{GestureParameters, ScaleParameters};
use crate::physical_modelling::coupled_resonator::{
    self, DEFAULT_CAVITY_FREQUENCY, DEFAULT_CAVITY_Q, DEFAULT_SHELL_FORMANT, DEFAULT_SHELL_Q,
};
use crate::physical_modelling::membrane_resonator::{
    self, MembraneResonator, DEFAULT_NUM_MODES, MAX_NUM_MODES,
};
use crate::physical_modelling::shell_resonator::ShellResonator;
use crate::utils::clamp_finite;
use crate::utils::units::midi_note_to_frequency;

/// Aggregate energy below which a voice is considered finished.
pub const SILENCE_FLOOR: f32 = 1.0e-7;

const SHELL_DRIVE_GAIN: f32 = 8.0;
const BASE_DECAY_SECONDS: f32 = 1.2;
const REFERENCE_FUNDAMENTAL: f32 = 60.0;
const MIN_FUNDAMENTAL: f32 = 10.0;
const MAX_FUNDAMENTAL_RATIO: f32 = 0.1;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    #[default]
    Idle,
    Active,
}

/// Settings shared by every voice of an instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceConfig {
    /// Membrane modes per voice, `1..=MAX_NUM_MODES`.
    pub num_modes: usize,
    /// Membrane tension, `0.0..=1.0`; `0.5` keeps the note's pitch and each
    /// end shifts it by an octave.
    pub tension: f32,
    /// Base membrane/shell coupling, `0.0..=1.0`.
    pub shell_coupling: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            num_modes: DEFAULT_NUM_MODES,
            tension: 0.5,
            shell_coupling: 0.5,
        }
    }
}

impl VoiceConfig {
    pub fn clamped(&self) -> Self {
        Self {
            num_modes: self.num_modes.clamp(1, MAX_NUM_MODES),
            tension: clamp_finite(self.tension, 0.0, 1.0, 0.5),
            shell_coupling: clamp_finite(self.shell_coupling, 0.0, 1.0, 0.5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GiantDrumVoice {
    sample_rate: f32,
    config: VoiceConfig,
    state: VoiceState,

    membrane: MembraneResonator,
    shell: ShellResonator,

    note: u8,
    velocity: f32,
    gesture: GestureParameters,
    scale: ScaleParameters,
    trigger_stamp: u64,

    energy: f32,
    membrane_output: f32,
    shell_output: f32,
}

impl Default for GiantDrumVoice {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            config: VoiceConfig::default(),
            state: VoiceState::Idle,
            membrane: MembraneResonator::new(),
            shell: ShellResonator::new(),
            note: 0,
            velocity: 0.0,
            gesture: GestureParameters::default(),
            scale: ScaleParameters::default(),
            trigger_stamp: 0,
            energy: 0.0,
            membrane_output: 0.0,
            shell_output: 0.0,
        }
    }
}

impl GiantDrumVoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.membrane.prepare(sample_rate);
        self.shell.prepare(sample_rate);
        self.reset();
    }

    /// Applied on the next trigger.
    pub fn set_config(&mut self, config: VoiceConfig) {
        self.config = config.clamped();
    }

    pub fn config(&self) -> VoiceConfig {
        self.config
    }

    /// Strikes the drum. An Active voice is re-struck without clearing its
    /// resonators, so the new hit grows out of the old one.
    pub fn trigger(
        &mut self,
        midi_note: u8,
        velocity: f32,
        gesture: &GestureParameters,
        scale: &ScaleParameters,
    ) {
        let gesture = gesture.clamped();
        let scale = scale.clamped();
        let velocity = clamp_finite(velocity, 0.0, 1.0, 0.0);

        let tension_ratio = (2.0 * self.config.tension - 1.0).exp2();
        let fundamental = clamp_finite(
            midi_note_to_frequency(midi_note as f32) * tension_ratio / scale.scale_meters.sqrt(),
            MIN_FUNDAMENTAL,
            MAX_FUNDAMENTAL_RATIO * self.sample_rate,
            REFERENCE_FUNDAMENTAL,
        );

        let decay_seconds = BASE_DECAY_SECONDS
            * scale.scale_meters.sqrt()
            * (1.0 + scale.transient_slowing)
            / (1.0 + 3.0 * scale.air_loss);

        self.membrane.set_parameters(membrane_resonator::Parameters {
            fundamental_frequency: fundamental,
            diameter_meters: scale.scale_meters,
            inharmonicity: 0.4 * scale.mass_bias + 0.6 * gesture.roughness,
            num_modes: self.config.num_modes,
            decay_seconds,
        });
        self.membrane
            .strike(gesture.force * velocity, gesture.speed, gesture.contact_area);

        let body_ratio = (fundamental / REFERENCE_FUNDAMENTAL).sqrt();
        self.shell.set_parameters(coupled_resonator::Parameters {
            cavity_frequency: DEFAULT_CAVITY_FREQUENCY * body_ratio * scale.scale_meters.powf(-0.25),
            shell_formant: DEFAULT_SHELL_FORMANT * body_ratio / scale.scale_meters.sqrt(),
            cavity_q: DEFAULT_CAVITY_Q * (1.0 + scale.mass_bias),
            shell_q: DEFAULT_SHELL_Q * (1.0 - 0.5 * scale.air_loss),
            coupling: 0.75 * self.config.shell_coupling + 0.25 * scale.mass_bias,
        });

        self.note = midi_note;
        self.velocity = velocity;
        self.gesture = gesture;
        self.scale = scale;
        self.energy = self.membrane.energy() + self.shell.energy();
        self.state = VoiceState::Active;
    }

    #[inline]
    pub fn process_sample(&mut self) -> f32 {
        if self.state == VoiceState::Idle {
            self.membrane_output = 0.0;
            self.shell_output = 0.0;
            return 0.0;
        }

        let membrane_out = self.membrane.process_sample();
        let membrane_energy = self.membrane.energy();

        self.shell
            .process_membrane_energy(membrane_out * SHELL_DRIVE_GAIN);
        let shell_out = self.shell.process_sample();

        self.energy = membrane_energy + self.shell.energy();
        if self.energy < SILENCE_FLOOR {
            self.release_to_idle();
        }

        self.membrane_output = membrane_out;
        self.shell_output = shell_out;

        membrane_out + shell_out
    }

    pub fn reset(&mut self) {
        self.release_to_idle();
    }

    fn release_to_idle(&mut self) {
        self.state = VoiceState::Idle;
        self.membrane.reset();
        self.shell.reset();
        self.energy = 0.0;
        self.membrane_output = 0.0;
        self.shell_output = 0.0;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == VoiceState::Active
    }

    #[inline]
    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// Membrane plus shell energy after the last processed sample.
    #[inline]
    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Membrane part of the last sample.
    #[inline]
    pub fn membrane_output(&self) -> f32 {
        self.membrane_output
    }

    /// Cavity/shell part of the last sample.
    #[inline]
    pub fn shell_output(&self) -> f32 {
        self.shell_output
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn gesture(&self) -> GestureParameters {
        self.gesture
    }

    pub fn scale(&self) -> ScaleParameters {
        self.scale
    }

    pub fn membrane(&self) -> &MembraneResonator {
        &self.membrane
    }

    pub fn shell(&self) -> &ShellResonator {
        &self.shell
    }

    /// Allocation order stamp, used to break ties when stealing.
    pub fn trigger_stamp(&self) -> u64 {
        self.trigger_stamp
    }

    pub(crate) fn set_trigger_stamp(&mut self, stamp: u64) {
        self.trigger_stamp = stamp;
    }
}
