//! Text presets holding an instrument's parameter values.
//!
//! The encoding is a small JSON object:
//!
//! ```json
//! {"instrument":"giant_drum","version":"0.1.0","parameters":{"master_volume":0.75}}
//! ```
//!
//! Loading checks the whole document before touching any value, so a rejected
//! preset leaves the instrument as it was. Parameters missing from a preset
//! keep their current values.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::error::InstrumentError;
use super::parameters::ParameterHandle;

/// Upper bound for an encoded preset in bytes.
pub const MAX_PRESET_SIZE: usize = 4096;

#[derive(Debug, Serialize, Deserialize)]
struct Preset {
    instrument: String,
    version: String,
    parameters: BTreeMap<String, f32>,
}

/// Writes the current values into `buffer` and returns the number of bytes
/// written.
pub fn save(
    instrument: &str,
    version: &str,
    parameters: &ParameterHandle,
    buffer: &mut [u8],
) -> Result<usize, InstrumentError> {
    let preset = Preset {
        instrument: instrument.to_string(),
        version: version.to_string(),
        parameters: parameters
            .iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    };

    let bytes = serde_json::to_vec(&preset).map_err(|err| {
        log::warn!("cannot encode preset for {instrument}: {err}");
        InstrumentError::MalformedPreset
    })?;

    if bytes.len() > MAX_PRESET_SIZE {
        return Err(InstrumentError::PresetTooLarge(bytes.len()));
    }
    if bytes.len() > buffer.len() {
        return Err(InstrumentError::PresetBufferTooSmall {
            required: bytes.len(),
            capacity: buffer.len(),
        });
    }

    buffer[..bytes.len()].copy_from_slice(&bytes);

    Ok(bytes.len())
}

/// Parses `data` and applies it to `parameters`, all or nothing.
pub fn load(
    instrument: &str,
    parameters: &ParameterHandle,
    data: &[u8],
) -> Result<(), InstrumentError> {
    // Hosts often hand over zero-padded buffers.
    let end = data.iter().position(|&byte| byte == 0).unwrap_or(data.len());
    let data = &data[..end];

    if data.len() > MAX_PRESET_SIZE {
        return Err(InstrumentError::PresetTooLarge(data.len()));
    }

    let preset: Preset = serde_json::from_slice(data).map_err(|err| {
        log::warn!("rejecting preset for {instrument}: {err}");
        InstrumentError::MalformedPreset
    })?;

    if preset.instrument != instrument {
        return Err(InstrumentError::PresetInstrumentMismatch {
            expected: instrument.to_string(),
            found: preset.instrument,
        });
    }

    let mut updates = Vec::with_capacity(preset.parameters.len());
    for (name, &value) in preset.parameters.iter() {
        let index = parameters
            .index_of(name)
            .ok_or_else(|| InstrumentError::UnknownParameter(name.clone()))?;
        if !value.is_finite() {
            return Err(InstrumentError::InvalidParameterValue {
                name: name.clone(),
                value,
            });
        }
        updates.push((index, parameters.layout()[index].clamp(value)));
    }

    for (index, value) in updates {
        parameters.store(index, value);
    }

    log::debug!(
        "loaded preset for {instrument} (version {}, {} values)",
        preset.version,
        preset.parameters.len()
    );

    Ok(())
}
