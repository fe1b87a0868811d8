//! Errors of the control-side instrument operations.

use alloc::string::String;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstrumentError {
    #[error("unsupported sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    #[error("unsupported block size: {0}")]
    InvalidBlockSize(usize),

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("parameter `{name}` cannot be set to {value}")]
    InvalidParameterValue { name: String, value: f32 },

    #[error("malformed preset")]
    MalformedPreset,

    #[error("preset is for instrument `{found}`, expected `{expected}`")]
    PresetInstrumentMismatch { expected: String, found: String },

    #[error("preset of {0} bytes exceeds the size limit")]
    PresetTooLarge(usize),

    #[error("preset needs {required} bytes, buffer holds {capacity}")]
    PresetBufferTooSmall { required: usize, capacity: usize },
}
