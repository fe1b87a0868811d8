//! The giant drum as a host-facing instrument.
//!
//! Parameters are read from their atomic cells at block start. `master_volume`
//! is ramped per sample; every other parameter is latched when a note starts,
//! so a sounding hit keeps the shape it was struck with.

#[allow(unused_imports)]
use num_traits::float::Float;

use arrayvec::ArrayVec;

use super::parameters::{ParameterHandle, ParameterInfo, ParameterStore};
use super::{preset, Instrument, InstrumentError, NoteEvent, NoteEventKind};
use super::{MAX_BLOCK_SIZE, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};
use crate::drums::giant_drum_voice::VoiceConfig;
use crate::drums::voice_manager::VoiceManager;
use crate::drums::{GestureParameters, ScaleParameters};
use crate::utils::parameter_interpolator::ParameterInterpolator;
use crate::utils::soft_clip;

pub const DEFAULT_POLYPHONY: usize = 8;

/// Events queued beyond this are dropped.
pub const MAX_PENDING_EVENTS: usize = 128;

const VOLUME_RAMP_SAMPLES: usize = 64;

const MASTER_VOLUME: usize = 0;
const MEMBRANE_TENSION: usize = 1;
const MEMBRANE_MODES: usize = 2;
const SHELL_COUPLING: usize = 3;
const STRIKE_FORCE: usize = 4;
const STRIKE_SPEED: usize = 5;
const CONTACT_AREA: usize = 6;
const ROUGHNESS: usize = 7;
const SCALE_METERS: usize = 8;
const MASS_BIAS: usize = 9;
const AIR_LOSS: usize = 10;
const TRANSIENT_SLOWING: usize = 11;

pub static PARAMETERS: [ParameterInfo; 12] = [
    ParameterInfo::new("master_volume", 0.0, 1.0, 0.8),
    ParameterInfo::new("membrane_tension", 0.0, 1.0, 0.5),
    ParameterInfo::new("membrane_modes", 1.0, 16.0, 8.0),
    ParameterInfo::new("shell_coupling", 0.0, 1.0, 0.5),
    ParameterInfo::new("strike_force", 0.0, 1.0, 0.8),
    ParameterInfo::new("strike_speed", 0.0, 1.0, 0.7),
    ParameterInfo::new("contact_area", 0.0, 1.0, 0.5),
    ParameterInfo::new("roughness", 0.0, 1.0, 0.2),
    ParameterInfo::new("scale_meters", 0.1, 20.0, 1.0),
    ParameterInfo::new("mass_bias", 0.0, 1.0, 0.5),
    ParameterInfo::new("air_loss", 0.0, 1.0, 0.3),
    ParameterInfo::new("transient_slowing", 0.0, 1.0, 0.2),
];

#[derive(Debug, Clone)]
pub struct GiantDrumInstrument {
    parameters: ParameterStore,
    voices: VoiceManager,
    polyphony: usize,

    volume: ParameterInterpolator,
    pending: ArrayVec<NoteEvent, MAX_PENDING_EVENTS>,

    sample_rate: f32,
    block_size: usize,
    prepared: bool,
}

impl Default for GiantDrumInstrument {
    fn default() -> Self {
        Self::new()
    }
}

impl GiantDrumInstrument {
    pub const NAME: &'static str = "giant_drum";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    pub fn new() -> Self {
        Self::with_polyphony(DEFAULT_POLYPHONY)
    }

    /// At least one voice is always allocated.
    pub fn with_polyphony(polyphony: usize) -> Self {
        let parameters = ParameterStore::new(&PARAMETERS);
        let volume = ParameterInterpolator::new(parameters.value(MASTER_VOLUME));

        Self {
            parameters,
            voices: VoiceManager::new(),
            polyphony: polyphony.max(1),
            volume,
            pending: ArrayVec::new(),
            sample_rate: 0.0,
            block_size: 0,
            prepared: false,
        }
    }

    /// A handle for changing parameters from another thread.
    pub fn parameter_handle(&self) -> ParameterHandle {
        self.parameters.handle()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn voices(&self) -> &VoiceManager {
        &self.voices
    }

    fn voice_config(&self) -> VoiceConfig {
        VoiceConfig {
            num_modes: self.parameters.value(MEMBRANE_MODES).round() as usize,
            tension: self.parameters.value(MEMBRANE_TENSION),
            shell_coupling: self.parameters.value(SHELL_COUPLING),
        }
    }

    fn gesture(&self) -> GestureParameters {
        GestureParameters {
            force: self.parameters.value(STRIKE_FORCE),
            speed: self.parameters.value(STRIKE_SPEED),
            contact_area: self.parameters.value(CONTACT_AREA),
            roughness: self.parameters.value(ROUGHNESS),
        }
    }

    fn scale(&self) -> ScaleParameters {
        ScaleParameters {
            scale_meters: self.parameters.value(SCALE_METERS),
            mass_bias: self.parameters.value(MASS_BIAS),
            air_loss: self.parameters.value(AIR_LOSS),
            transient_slowing: self.parameters.value(TRANSIENT_SLOWING),
        }
    }

    fn apply_event(&mut self, event: NoteEvent) {
        match event.kind {
            NoteEventKind::NoteOn => {
                let velocity = event.note.velocity;
                if velocity.is_nan() || velocity <= 0.0 {
                    return;
                }
                self.voices.set_config(self.voice_config());
                let gesture = self.gesture();
                let scale = self.scale();
                self.voices.handle_note_on(
                    event.note.midi_note.min(127),
                    velocity.min(1.0),
                    &gesture,
                    &scale,
                );
            }
            // Drums ring out; the voice ends when its energy is gone.
            NoteEventKind::NoteOff => {}
        }
    }

    #[inline]
    fn render_until(&mut self, outputs: &mut [&mut [f32]], start: usize, end: usize) {
        for index in start..end {
            let out = soft_clip(self.voices.process_sample() * self.volume.next());
            for channel in outputs.iter_mut() {
                channel[index] = out;
            }
        }
    }
}

impl Instrument for GiantDrumInstrument {
    fn prepare(&mut self, sample_rate: f32, block_size: usize) -> Result<(), InstrumentError> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
            self.prepared = false;
            log::warn!("{}: rejecting sample rate {sample_rate}", Self::NAME);
            return Err(InstrumentError::InvalidSampleRate(sample_rate));
        }
        if block_size == 0 || block_size > MAX_BLOCK_SIZE {
            self.prepared = false;
            log::warn!("{}: rejecting block size {block_size}", Self::NAME);
            return Err(InstrumentError::InvalidBlockSize(block_size));
        }

        self.sample_rate = sample_rate;
        self.block_size = block_size;
        self.voices.set_config(self.voice_config());
        self.voices.prepare(sample_rate, self.polyphony);
        self.volume.init(self.parameters.value(MASTER_VOLUME));
        self.pending.clear();
        self.prepared = true;

        log::info!(
            "{} prepared at {sample_rate} Hz, block size {block_size}, {} voices",
            Self::NAME,
            self.polyphony
        );

        Ok(())
    }

    fn reset(&mut self) {
        self.voices.reset();
        self.pending.clear();
        self.volume.init(self.parameters.value(MASTER_VOLUME));

        log::debug!("{} reset", Self::NAME);
    }

    fn process(&mut self, outputs: &mut [&mut [f32]], num_samples: usize) {
        let num_samples = outputs
            .iter()
            .map(|channel| channel.len())
            .fold(num_samples, usize::min);

        if !self.prepared {
            for channel in outputs.iter_mut() {
                channel[..num_samples].fill(0.0);
            }
            return;
        }

        self.volume
            .set_target(self.parameters.value(MASTER_VOLUME), VOLUME_RAMP_SAMPLES);

        let mut position = 0;
        while position < num_samples {
            while let Some(event) = self.pending.first() {
                if event.sample_offset as usize > position {
                    break;
                }
                let event = self.pending.remove(0);
                self.apply_event(event);
            }

            let next = self
                .pending
                .first()
                .map_or(num_samples, |event| {
                    (event.sample_offset as usize).min(num_samples)
                });
            self.render_until(outputs, position, next);
            position = next;
        }

        let elapsed = u32::try_from(num_samples).unwrap_or(u32::MAX);
        for event in self.pending.iter_mut() {
            event.sample_offset = event.sample_offset.saturating_sub(elapsed);
        }
    }

    fn handle_event(&mut self, event: NoteEvent) {
        // Keep the queue ordered by offset; equal offsets stay in arrival order.
        let index = self
            .pending
            .iter()
            .position(|pending| pending.sample_offset > event.sample_offset)
            .unwrap_or(self.pending.len());

        if self.pending.try_insert(index, event).is_err() {
            log::warn!(
                "{}: event queue full, dropping {:?} for note {}",
                Self::NAME,
                event.kind,
                event.note.midi_note
            );
        }
    }

    fn parameter(&self, name: &str) -> Option<f32> {
        self.parameters.get(name)
    }

    fn set_parameter(&mut self, name: &str, value: f32) -> Result<(), InstrumentError> {
        self.parameters.set(name, value).map(|_| ())
    }

    fn parameter_layout(&self) -> &'static [ParameterInfo] {
        &PARAMETERS
    }

    fn save_preset(&self, buffer: &mut [u8]) -> Result<usize, InstrumentError> {
        preset::save(Self::NAME, Self::VERSION, &self.parameters, buffer)
    }

    fn load_preset(&mut self, data: &[u8]) -> Result<(), InstrumentError> {
        preset::load(Self::NAME, &self.parameters, data)
    }

    fn active_voice_count(&self) -> usize {
        self.voices.active_voice_count()
    }

    fn max_polyphony(&self) -> usize {
        self.polyphony
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn version(&self) -> &'static str {
        Self::VERSION
    }
}
