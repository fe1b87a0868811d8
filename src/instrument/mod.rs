//! Host-facing instrument layer.
//!
//! An [`Instrument`] renders blocks of audio from note events and named
//! parameters. Instruments are created by name through the [`registry`].

pub mod error;
pub mod giant_drum_instrument;
pub mod parameters;
pub mod preset;
pub mod registry;

use dyn_clone::DynClone;

pub use error::InstrumentError;

/// Supported `prepare` sample rates in Hz.
pub const MIN_SAMPLE_RATE: f32 = 8000.0;
pub const MAX_SAMPLE_RATE: f32 = 384000.0;

/// Largest block size accepted by `prepare`.
pub const MAX_BLOCK_SIZE: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEventKind {
    NoteOn,
    NoteOff,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteData {
    pub midi_note: u8,
    /// Velocity in `0.0..=1.0`.
    pub velocity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub kind: NoteEventKind,
    /// Host timestamp, passed through untouched.
    pub timestamp: u64,
    /// Sample offset from the start of the next `process` call.
    pub sample_offset: u32,
    pub note: NoteData,
}

impl NoteEvent {
    pub fn note_on(sample_offset: u32, midi_note: u8, velocity: f32) -> Self {
        Self {
            kind: NoteEventKind::NoteOn,
            timestamp: 0,
            sample_offset,
            note: NoteData {
                midi_note,
                velocity,
            },
        }
    }

    pub fn note_off(sample_offset: u32, midi_note: u8) -> Self {
        Self {
            kind: NoteEventKind::NoteOff,
            timestamp: 0,
            sample_offset,
            note: NoteData {
                midi_note,
                velocity: 0.0,
            },
        }
    }

    pub fn with_timestamp(self, timestamp: u64) -> Self {
        Self { timestamp, ..self }
    }
}

/// Common interface of all synthesis engines.
///
/// `process` and `handle_event` run on the audio thread and never allocate.
/// Everything returning a `Result` is a control-side operation.
pub trait Instrument: DynClone + Send {
    /// Allocates voices and buffers. On error the instrument stays
    /// unprepared and renders silence.
    fn prepare(&mut self, sample_rate: f32, block_size: usize) -> Result<(), InstrumentError>;

    /// Silences all voices and clears pending events.
    fn reset(&mut self);

    /// Renders `num_samples` frames into every channel of `outputs`.
    fn process(&mut self, outputs: &mut [&mut [f32]], num_samples: usize);

    /// Queues an event for the next `process` call.
    fn handle_event(&mut self, event: NoteEvent);

    fn parameter(&self, name: &str) -> Option<f32>;

    fn set_parameter(&mut self, name: &str, value: f32) -> Result<(), InstrumentError>;

    /// Every parameter this instrument accepts, with its range and default.
    fn parameter_layout(&self) -> &'static [parameters::ParameterInfo];

    /// Encodes the parameter state into `buffer`, returning the byte count.
    fn save_preset(&self, buffer: &mut [u8]) -> Result<usize, InstrumentError>;

    fn load_preset(&mut self, data: &[u8]) -> Result<(), InstrumentError>;

    fn active_voice_count(&self) -> usize;

    fn max_polyphony(&self) -> usize;

    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;
}

dyn_clone::clone_trait_object!(Instrument);
