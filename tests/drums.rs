//! Tests for the drum voice and the voice pool


use giant_drum_dsp::drums::giant_drum_voice::{
    GiantDrumVoice, VoiceConfig, VoiceState, SILENCE_FLOOR,
};
use giant_drum_dsp::drums::voice_manager::VoiceManager;
use giant_drum_dsp::drums::{GestureParameters, ScaleParameters};
use more_asserts::*;

const SAMPLE_RATE: f32 = 48000.0;

#[test]
fn voice_rings_out_to_idle() {
    let max_duration = 10.0;

    let mut voice = GiantDrumVoice::new();
    voice.prepare(SAMPLE_RATE);
    assert_eq!(voice.state(), VoiceState::Idle);

    voice.trigger(36, 1.0, &GestureParameters::default(), &ScaleParameters::default());
    assert!(voice.is_active());
    assert_gt!(voice.energy(), SILENCE_FLOOR);
    assert_eq!(voice.note(), 36);

    let mut wav_data = Vec::new();
    for _ in 0..(max_duration * SAMPLE_RATE) as usize {
        let sample = voice.process_sample();
        assert!(sample.is_finite());
        wav_data.push(sample);
        if !voice.is_active() {
            break;
        }
    }

    assert_eq!(voice.state(), VoiceState::Idle);
    assert_eq!(voice.energy(), 0.0);
    assert_eq!(voice.process_sample(), 0.0);

    wav_writer::write("drums/giant_drum_voice.wav", SAMPLE_RATE, &wav_data).ok();
}

#[test]
fn shell_is_audible() {
    let mut voice = GiantDrumVoice::new();
    voice.prepare(SAMPLE_RATE);
    voice.trigger(36, 1.0, &GestureParameters::default(), &ScaleParameters::default());

    let mut membrane_peak = 0.0f32;
    let mut shell_peak = 0.0f32;
    for _ in 0..SAMPLE_RATE as usize {
        let sample = voice.process_sample();
        assert_eq!(sample, voice.membrane_output() + voice.shell_output());
        membrane_peak = membrane_peak.max(voice.membrane_output().abs());
        shell_peak = shell_peak.max(voice.shell_output().abs());
    }

    assert_gt!(membrane_peak, 0.0);
    // Within 20 dB of the membrane.
    assert_ge!(shell_peak, membrane_peak * 0.1);
}

#[test]
fn air_loss_shortens_ring_out() {
    let ring_out = |air_loss: f32| {
        let mut voice = GiantDrumVoice::new();
        voice.prepare(SAMPLE_RATE);
        voice.trigger(
            36,
            1.0,
            &GestureParameters::default(),
            &ScaleParameters {
                air_loss,
                ..Default::default()
            },
        );

        let mut samples = 0;
        while voice.is_active() && samples < 20 * SAMPLE_RATE as usize {
            voice.process_sample();
            samples += 1;
        }
        assert!(!voice.is_active());
        samples
    };

    assert_lt!(ring_out(1.0), ring_out(0.0));
}

#[test]
fn voice_scale_sweep() {
    let duration = 3.0;

    for &scale_meters in [0.5, 2.0, 8.0].iter() {
        let mut voice = GiantDrumVoice::new();
        voice.prepare(SAMPLE_RATE);
        voice.trigger(
            40,
            0.9,
            &GestureParameters::default(),
            &ScaleParameters {
                scale_meters,
                ..Default::default()
            },
        );

        let wav_data: Vec<f32> = (0..(duration * SAMPLE_RATE) as usize)
            .map(|_| voice.process_sample())
            .collect();

        assert!(wav_data.iter().all(|sample| sample.is_finite()));
        assert!(wav_data.iter().any(|&sample| sample != 0.0));

        wav_writer::write(
            format!("drums/giant_drum_voice_{scale_meters}m.wav"),
            SAMPLE_RATE,
            &wav_data,
        )
        .ok();
    }
}

#[test]
fn voice_clamps_inputs() {
    let mut voice = GiantDrumVoice::new();
    voice.prepare(SAMPLE_RATE);
    voice.set_config(VoiceConfig {
        num_modes: 0,
        tension: f32::NAN,
        shell_coupling: 4.0,
    });

    let config = voice.config();
    assert_eq!(config.num_modes, 1);
    assert_eq!(config.tension, 0.5);
    assert_eq!(config.shell_coupling, 1.0);

    voice.trigger(
        127,
        f32::INFINITY,
        &GestureParameters {
            force: 2.0,
            speed: -1.0,
            contact_area: f32::NAN,
            roughness: 1.0,
        },
        &ScaleParameters {
            scale_meters: 100.0,
            mass_bias: -3.0,
            air_loss: 1.0,
            transient_slowing: 1.0,
        },
    );

    assert_eq!(voice.scale().scale_meters, 20.0);
    assert_eq!(voice.gesture().force, 1.0);
    assert_eq!(voice.gesture().speed, 0.0);

    for _ in 0..4800 {
        assert!(voice.process_sample().is_finite());
    }
}

#[test]
fn voice_reset() {
    let mut voice = GiantDrumVoice::new();
    voice.prepare(SAMPLE_RATE);
    voice.trigger(36, 1.0, &GestureParameters::default(), &ScaleParameters::default());

    for _ in 0..100 {
        voice.process_sample();
    }
    assert!(voice.is_active());

    voice.reset();
    assert!(!voice.is_active());
    assert_eq!(voice.energy(), 0.0);
    assert_eq!(voice.membrane().energy(), 0.0);
    assert_eq!(voice.shell().energy(), 0.0);
}

#[test]
fn manager_counts_active_voices() {
    let gesture = GestureParameters::default();
    let scale = ScaleParameters::default();

    let mut manager = VoiceManager::new();
    manager.prepare(SAMPLE_RATE, 8);
    assert_eq!(manager.max_voices(), 8);
    assert_eq!(manager.active_voice_count(), 0);

    manager.handle_note_on(36, 1.0, &gesture, &scale);
    manager.handle_note_on(40, 1.0, &gesture, &scale);
    manager.handle_note_on(43, 1.0, &gesture, &scale);

    assert_eq!(manager.active_voice_count(), 3);
}

#[test]
fn manager_never_exceeds_capacity() {
    let gesture = GestureParameters::default();
    let scale = ScaleParameters::default();

    let mut manager = VoiceManager::new();
    manager.prepare(SAMPLE_RATE, 4);

    let mut wav_data = Vec::new();
    for note in 30..50 {
        manager.handle_note_on(note, 0.8, &gesture, &scale);
        assert_le!(manager.active_voice_count(), 4);

        for _ in 0..2400 {
            let sample = manager.process_sample();
            assert!(sample.is_finite());
            wav_data.push(sample);
        }
        assert_le!(manager.active_voice_count(), 4);
    }

    wav_writer::write("drums/voice_manager.wav", SAMPLE_RATE, &wav_data).ok();
}

#[test]
fn manager_steals_quietest_voice() {
    let gesture = GestureParameters::default();
    let scale = ScaleParameters::default();

    let mut manager = VoiceManager::new();
    manager.prepare(SAMPLE_RATE, 2);

    manager.handle_note_on(36, 1.0, &gesture, &scale);
    manager.handle_note_on(38, 0.2, &gesture, &scale);
    assert_gt!(manager.voices()[0].energy(), manager.voices()[1].energy());

    manager.handle_note_on(40, 1.0, &gesture, &scale);

    assert_eq!(manager.active_voice_count(), 2);
    assert_eq!(manager.voices()[0].note(), 36);
    assert_eq!(manager.voices()[1].note(), 40);
}

#[test]
fn manager_steals_oldest_on_equal_energy() {
    let gesture = GestureParameters::default();
    let scale = ScaleParameters::default();

    let mut manager = VoiceManager::new();
    manager.prepare(SAMPLE_RATE, 2);

    manager.handle_note_on(36, 1.0, &gesture, &scale);
    manager.handle_note_on(36, 1.0, &gesture, &scale);
    assert_eq!(manager.voices()[0].energy(), manager.voices()[1].energy());
    assert_lt!(
        manager.voices()[0].trigger_stamp(),
        manager.voices()[1].trigger_stamp()
    );

    manager.handle_note_on(45, 1.0, &gesture, &scale);

    assert_eq!(manager.voices()[0].note(), 45);
    assert_eq!(manager.voices()[1].note(), 36);
}

#[test]
fn manager_reset() {
    let gesture = GestureParameters::default();
    let scale = ScaleParameters::default();

    let mut manager = VoiceManager::new();
    manager.prepare(SAMPLE_RATE, 4);
    manager.set_config(VoiceConfig {
        num_modes: 12,
        ..Default::default()
    });
    assert_eq!(manager.config().num_modes, 12);

    for note in [36, 38, 40] {
        manager.handle_note_on(note, 1.0, &gesture, &scale);
    }
    for _ in 0..256 {
        manager.process_sample();
    }
    assert_eq!(manager.active_voice_count(), 3);

    manager.reset();
    assert_eq!(manager.active_voice_count(), 0);
    assert_eq!(manager.process_sample(), 0.0);
    assert_eq!(manager.max_voices(), 4);
}

#[test]
fn empty_pool_drops_notes() {
    let mut manager = VoiceManager::new();
    manager.prepare(SAMPLE_RATE, 0);

    manager.handle_note_on(
        36,
        1.0,
        &GestureParameters::default(),
        &ScaleParameters::default(),
    );
    assert_eq!(manager.active_voice_count(), 0);
    assert_eq!(manager.process_sample(), 0.0);
}
