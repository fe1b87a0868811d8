//! Fixed-size voice pool with quietest-voice stealing.

use alloc::vec::Vec;

use super::giant_drum_voice::{GiantDrumVoice, VoiceConfig};
use super::{GestureParameters, ScaleParameters};

#[derive(Debug, Default, Clone)]
pub struct VoiceManager {
    voices: Vec<GiantDrumVoice>,
    config: VoiceConfig,
    trigger_counter: u64,
}

impl VoiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates `max_voices` Idle voices. This is the only allocation; the
    /// per-sample path never allocates.
    pub fn prepare(&mut self, sample_rate: f32, max_voices: usize) {
        self.voices.clear();
        self.voices.reserve_exact(max_voices);
        for _ in 0..max_voices {
            let mut voice = GiantDrumVoice::new();
            voice.prepare(sample_rate);
            voice.set_config(self.config);
            self.voices.push(voice);
        }
        self.trigger_counter = 0;

        log::debug!("voice pool prepared: {max_voices} voices at {sample_rate} Hz");
    }

    /// Applied to every voice on its next trigger.
    pub fn set_config(&mut self, config: VoiceConfig) {
        let config = config.clamped();
        if config == self.config {
            return;
        }
        self.config = config;
        for voice in self.voices.iter_mut() {
            voice.set_config(config);
        }
    }

    pub fn config(&self) -> VoiceConfig {
        self.config
    }

    /// Starts a note on the first Idle voice, or steals the Active voice with
    /// the lowest energy (the earliest triggered one on a tie).
    pub fn handle_note_on(
        &mut self,
        note: u8,
        velocity: f32,
        gesture: &GestureParameters,
        scale: &ScaleParameters,
    ) {
        let Some(index) = self.allocate() else {
            log::warn!("note {note} dropped: voice pool is empty");
            return;
        };

        self.trigger_counter += 1;
        let voice = &mut self.voices[index];
        voice.trigger(note, velocity, gesture, scale);
        voice.set_trigger_stamp(self.trigger_counter);
    }

    fn allocate(&self) -> Option<usize> {
        if let Some(index) = self.voices.iter().position(|voice| !voice.is_active()) {
            return Some(index);
        }

        let index = self
            .voices
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.energy()
                    .total_cmp(&b.energy())
                    .then(a.trigger_stamp().cmp(&b.trigger_stamp()))
            })
            .map(|(index, _)| index)?;

        log::debug!(
            "stealing voice {index} (note {}, energy {})",
            self.voices[index].note(),
            self.voices[index].energy()
        );

        Some(index)
    }

    /// Sums all Active voices. Voices that fall silent go Idle here.
    #[inline]
    pub fn process_sample(&mut self) -> f32 {
        let mut out = 0.0;
        for voice in self.voices.iter_mut().filter(|voice| voice.is_active()) {
            out += voice.process_sample();
        }
        out
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|voice| voice.is_active()).count()
    }

    pub fn max_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> &[GiantDrumVoice] {
        &self.voices
    }

    pub fn reset(&mut self) {
        for voice in self.voices.iter_mut() {
            voice.reset();
        }
    }
}
