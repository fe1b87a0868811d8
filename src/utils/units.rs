//! Pitch and level conversions.

#[allow(unused_imports)]
use num_traits::float::Float;

/// Frequency of MIDI note 69 (A4) in Hz.
pub const A4_FREQUENCY: f32 = 440.0;

/// MIDI note number of A4.
pub const A4_NOTE: f32 = 69.0;

#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    (semitones / 12.0).exp2()
}

/// Equal-tempered frequency in Hz for a (possibly fractional) MIDI note.
#[inline]
pub fn midi_note_to_frequency(midi_note: f32) -> f32 {
    let midi_note = midi_note.clamp(0.0, 127.0);

    A4_FREQUENCY * semitones_to_ratio(midi_note - A4_NOTE)
}

/// Per-sample multiplier that attenuates an amplitude by 60 dB over `seconds`.
#[inline]
pub fn t60_to_decay(seconds: f32, sample_rate: f32) -> f32 {
    // ln(1000)
    const LN_1000: f32 = 6.907_755;

    if seconds <= 0.0 || sample_rate <= 0.0 {
        return 0.0;
    }

    (-LN_1000 / (seconds * sample_rate)).exp()
}
